use crate::models::{NewPaste, Paste};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub trait Store {
    /// Persist a paste, assigning it the next id.
    async fn create(&self, paste: &NewPaste) -> crate::AppResult<Paste>;

    /// Get a paste by address. Absence is `Ok(None)`, not an error.
    async fn get(&self, address: &str) -> crate::AppResult<Option<Paste>>;

    /// Release the store's resources.
    async fn close(&self);
}

#[derive(Clone)]
pub enum AnyStore {
    Memory(MemoryStore),
    Sqlite(SqliteStore),
}

impl Store for AnyStore {
    async fn create(&self, paste: &NewPaste) -> crate::AppResult<Paste> {
        match self {
            AnyStore::Memory(memory) => memory.create(paste).await,
            AnyStore::Sqlite(sqlite) => sqlite.create(paste).await,
        }
    }

    async fn get(&self, address: &str) -> crate::AppResult<Option<Paste>> {
        match self {
            AnyStore::Memory(memory) => memory.get(address).await,
            AnyStore::Sqlite(sqlite) => sqlite.get(address).await,
        }
    }

    async fn close(&self) {
        match self {
            AnyStore::Memory(memory) => memory.close().await,
            AnyStore::Sqlite(sqlite) => sqlite.close().await,
        }
    }
}

impl From<MemoryStore> for AnyStore {
    fn from(value: MemoryStore) -> Self {
        AnyStore::Memory(value)
    }
}

impl From<SqliteStore> for AnyStore {
    fn from(value: SqliteStore) -> Self {
        AnyStore::Sqlite(value)
    }
}
