//! Shared utilities for tipy.

pub mod format;
pub mod logging;

pub use format::{format_address, format_amount, LAMPORTS_PER_COIN};
pub use logging::{init_logging, LogFormat, LoggingError};
