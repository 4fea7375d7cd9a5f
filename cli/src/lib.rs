//! Pieces of the `tipy` binary that are worth testing on their own.

pub mod config;
pub mod keyfile;

pub use config::{ConfigError, RentConfig, TipyConfig};
pub use keyfile::{read_keypair, write_keypair, KeyfileError};
