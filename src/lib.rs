//! A small pastebin: submit text, get a short address back, and view it later
//! with syntax highlighting.

use std::sync::Arc;

use anyhow::Context;

pub mod address;
pub mod commands;
pub mod config;
pub mod controllers;
pub mod error;
pub mod highlight;
pub mod models;
pub mod storage;
pub mod templates;
pub mod types;
pub mod validator;

pub use config::Config;
pub use error::{AppError, AppResult};

use config::StoreConfig;
use highlight::Highlighter;
use storage::{AnyStore, MemoryStore, SqliteStore};
use templates::Templates;

/// State shared by every request.
#[derive(Clone)]
pub struct App {
    pub config: Arc<Config>,
    pub store: AnyStore,
    pub highlighter: Arc<Highlighter>,
    pub templates: Templates,
}

impl App {
    pub fn new(
        config: Config,
        store: impl Into<AnyStore>,
        templates: Templates,
        highlighter: Highlighter,
    ) -> Self {
        App {
            config: Arc::new(config),
            store: store.into(),
            highlighter: Arc::new(highlighter),
            templates,
        }
    }

    /// Open the configured store, templates and highlighter.
    pub async fn load(config: Config) -> anyhow::Result<Self> {
        let store: AnyStore = match &config.store {
            StoreConfig::Memory => MemoryStore::new().into(),
            StoreConfig::Sqlite { connection_string } => {
                let store = SqliteStore::connect(connection_string).await?;
                store.migrate().await?;
                store.into()
            }
        };

        let templates = Templates::load(config.templates_dir(), !config.production)
            .context("failed to load templates")?;
        let highlighter = Highlighter::new().context("failed to load highlighter")?;

        Ok(App::new(config, store, templates, highlighter))
    }
}
