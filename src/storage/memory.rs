use std::sync::{Arc, Mutex};

use super::Store;
use crate::models::{NewPaste, Paste};
use crate::AppError;

/// Process-local store; contents are lost on exit.
#[derive(Clone, Default)]
pub struct MemoryStore {
    pastes: Arc<Mutex<Vec<Paste>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    async fn create(&self, paste: &NewPaste) -> crate::AppResult<Paste> {
        let mut pastes = self.pastes.lock().map_err(|_| AppError::StorePoisoned)?;

        if pastes.iter().any(|p| p.address == paste.address) {
            return Err(AppError::AddressTaken);
        }

        let id = pastes.last().map_or(0, |p| p.id) + 1;
        let paste = paste.clone().into_paste(id);
        pastes.push(paste.clone());

        Ok(paste)
    }

    async fn get(&self, address: &str) -> crate::AppResult<Option<Paste>> {
        let pastes = self.pastes.lock().map_err(|_| AppError::StorePoisoned)?;
        Ok(pastes.iter().find(|p| p.address == address).cloned())
    }

    async fn close(&self) {}
}
