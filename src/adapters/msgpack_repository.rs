//! MessagePack implementation of the Q-table repository.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use crate::{Result, error::Error, ports::QTableRepository, q_learning::SavedQTable};

/// MessagePack-based Q-table repository.
///
/// A cart-pole table holds tens of thousands of floats, so the compact
/// binary encoding of `rmp_serde` is used rather than JSON.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use tdrl::{
///     adapters::MsgPackRepository,
///     ports::QTableRepository,
///     q_learning::{QTable, SavedQTable, TdAlgorithm},
/// };
///
/// let repo = MsgPackRepository;
/// let saved = SavedQTable::new(TdAlgorithm::Sarsa, "Maze", QTable::new(50, 4, 0.0));
///
/// repo.save(&saved, Path::new("maze.qtable"))?;
/// let loaded = repo.load(Path::new("maze.qtable"))?;
/// # Ok::<(), tdrl::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    pub fn new() -> Self {
        Self
    }
}

impl QTableRepository for MsgPackRepository {
    fn save(&self, saved: &SavedQTable, path: &Path) -> Result<()> {
        let file = File::create(path)
            .map_err(|source| Error::io(format!("create file {}", path.display()), source))?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, saved).map_err(|e| {
            Error::SerializationContext {
                operation: "serialize q-table to MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;
        writer
            .flush()
            .map_err(|source| Error::io(format!("write file {}", path.display()), source))?;

        tracing::debug!(
            path = %path.display(),
            states = saved.q_table.state_size(),
            actions = saved.q_table.action_size(),
            "q-table saved"
        );
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedQTable> {
        let file = File::open(path)
            .map_err(|source| Error::io(format!("open file {}", path.display()), source))?;

        rmp_serde::decode::from_read(BufReader::new(file)).map_err(|e| {
            Error::SerializationContext {
                operation: "deserialize q-table from MessagePack".to_string(),
                message: e.to_string(),
            }
        })
    }
}
