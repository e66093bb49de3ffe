//! Analysis tools for training runs

pub mod returns;

pub use returns::{ReturnStats, moving_average};
