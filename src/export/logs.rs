//! Plain-text run logs
//!
//! - Returns log: one return per line, 15 decimals
//! - History log: `action \t reward \t state \t info`, reward with 15 decimals

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{Error, Result, history::History};

/// Write one return per line
pub fn write_returns<W: Write>(writer: &mut W, returns: &[f64]) -> Result<()> {
    for value in returns {
        writeln!(writer, "{value:.15}")?;
    }
    Ok(())
}

/// Write one tab-separated line per recorded step
pub fn write_history<W: Write>(writer: &mut W, history: &History) -> Result<()> {
    for record in history.records() {
        writeln!(
            writer,
            "{}\t{:.15}\t{}\t{}",
            record.action, record.reward, record.state, record.info
        )?;
    }
    Ok(())
}

/// Save the returns log to `path`, replacing any existing file
pub fn save_returns(path: &Path, returns: &[f64]) -> Result<()> {
    let operation = || format!("write returns log {}", path.display());
    let mut writer = BufWriter::new(File::create(path).map_err(|e| Error::io(operation(), e))?);
    write_returns(&mut writer, returns)?;
    writer.flush().map_err(|e| Error::io(operation(), e))?;
    tracing::debug!(path = %path.display(), lines = returns.len(), "returns log written");
    Ok(())
}

/// Save the evaluation history log to `path`, replacing any existing file
pub fn save_history(path: &Path, history: &History) -> Result<()> {
    let operation = || format!("write history log {}", path.display());
    let mut writer = BufWriter::new(File::create(path).map_err(|e| Error::io(operation(), e))?);
    write_history(&mut writer, history)?;
    writer.flush().map_err(|e| Error::io(operation(), e))?;
    tracing::debug!(path = %path.display(), lines = history.len(), "history log written");
    Ok(())
}
