//! Repository port for Q-table persistence.

use std::path::Path;

use crate::{Result, q_learning::SavedQTable};

/// Port for persisting and loading trained Q-tables.
///
/// # Examples
///
/// ```no_run
/// use tdrl::ports::QTableRepository;
/// use tdrl::q_learning::SavedQTable;
/// use std::path::Path;
///
/// fn save_table<R: QTableRepository>(
///     repo: &R,
///     saved: &SavedQTable,
///     path: &Path,
/// ) -> tdrl::Result<()> {
///     repo.save(saved, path)
/// }
/// ```
pub trait QTableRepository {
    /// Save a table to persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be written or serialization fails.
    fn save(&self, saved: &SavedQTable, path: &Path) -> Result<()>;

    /// Load a table from persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be decoded.
    fn load(&self, path: &Path) -> Result<SavedQTable>;
}
