//! Export of run outputs
//!
//! Currently supports the plain-text returns and evaluation-history logs.

mod logs;

pub use logs::{save_history, save_returns, write_history, write_returns};
