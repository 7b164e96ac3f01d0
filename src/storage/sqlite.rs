use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Connection;
use tokio::time::timeout;
use tracing::{debug, info};

use super::Store;
use crate::models::{NewPaste, Paste};
use crate::AppError;

/// Upper bound for connecting and for each store operation.
const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    query_timeout: Duration,
}

impl SqliteStore {
    /// Connect to a database by URL and make sure it answers.
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("invalid connection string {url:?}"))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .acquire_timeout(QUERY_TIMEOUT)
            .connect_with(options)
            .await
            .context("failed to open sqlite database")?;

        timeout(QUERY_TIMEOUT, async {
            pool.acquire().await?.ping().await?;
            Ok::<_, sqlx::Error>(())
        })
        .await
        .context("timed out pinging sqlite database")?
        .context("failed to ping sqlite database")?;

        info!("connected to sqlite database");

        Ok(Self {
            pool,
            query_timeout: QUERY_TIMEOUT,
        })
    }

    /// Bound each store operation by `query_timeout` instead of the default.
    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    /// Apply pending schema migrations.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!()
            .run(&self.pool)
            .await
            .context("failed to run migrations")?;
        Ok(())
    }
}

impl Store for SqliteStore {
    async fn create(&self, paste: &NewPaste) -> crate::AppResult<Paste> {
        let id = timeout(self.query_timeout, async {
            let mut tx = self.pool.begin().await?;

            let result = sqlx::query(
                "INSERT INTO pastes (text, lang, line_count, addr, created_at) VALUES (?, ?, ?, \
                 ?, ?)",
            )
            .bind(&paste.text)
            .bind(&paste.lang)
            .bind(paste.line_count)
            .bind(&paste.address)
            .bind(&paste.timestamp)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() != 1 {
                return Err(AppError::UnexpectedRowCount(result.rows_affected()));
            }

            tx.commit().await?;
            Ok::<_, AppError>(result.last_insert_rowid())
        })
        .await
        .map_err(|_| AppError::Timeout)??;

        debug!(id, address = %paste.address, "inserted paste");

        Ok(paste.clone().into_paste(id))
    }

    async fn get(&self, address: &str) -> crate::AppResult<Option<Paste>> {
        timeout(self.query_timeout, async {
            let mut tx = self.pool.begin().await?;
            let paste = sqlx::query_as::<_, Paste>(
                "SELECT id, text, lang, line_count, addr, created_at FROM pastes WHERE addr = ?",
            )
            .bind(address)
            .fetch_optional(&mut *tx)
            .await?;
            tx.commit().await?;
            Ok::<_, AppError>(paste)
        })
        .await
        .map_err(|_| AppError::Timeout)?
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
