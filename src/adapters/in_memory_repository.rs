//! In-memory Q-table repository for testing.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{Result, error::Error, ports::QTableRepository, q_learning::SavedQTable};

type Storage = HashMap<String, Vec<u8>>;

/// In-memory repository for testing.
///
/// Tables are stored as encoded MessagePack bytes keyed by path, so the
/// serialization path is exercised without touching the file system. All
/// clones share the same storage.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<Storage>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> MutexGuard<'_, Storage> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of tables currently stored
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    pub fn clear(&self) {
        self.storage().clear();
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.storage().contains_key(&key(path))
    }
}

fn key(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

impl QTableRepository for InMemoryRepository {
    fn save(&self, saved: &SavedQTable, path: &Path) -> Result<()> {
        let bytes = rmp_serde::to_vec(saved).map_err(|e| Error::SerializationContext {
            operation: "serialize q-table for in-memory storage".to_string(),
            message: e.to_string(),
        })?;

        self.storage().insert(key(path), bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedQTable> {
        let storage = self.storage();
        let bytes = storage.get(&key(path)).ok_or_else(|| {
            Error::io(
                format!("load q-table from in-memory storage at {}", path.display()),
                std::io::Error::new(std::io::ErrorKind::NotFound, "key not found in memory"),
            )
        })?;

        rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
            operation: "deserialize q-table from in-memory storage".to_string(),
            message: e.to_string(),
        })
    }
}
