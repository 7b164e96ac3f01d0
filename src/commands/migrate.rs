use tracing::{info, warn};

use crate::config::StoreConfig;
use crate::storage::{SqliteStore, Store};

pub async fn run(store: &StoreConfig) -> anyhow::Result<()> {
    let StoreConfig::Sqlite { connection_string } = store else {
        warn!("memory store configured, nothing to migrate");
        return Ok(());
    };

    let store = SqliteStore::connect(connection_string).await?;
    store.migrate().await?;
    store.close().await;

    info!("migrations applied");
    Ok(())
}
