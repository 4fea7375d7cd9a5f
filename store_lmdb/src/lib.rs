//! LMDB storage backend for tipy.
//!
//! Implements [`tipy_store::AccountStore`] using the `heed` LMDB bindings.
//! Accounts live in one database keyed by their 32 address bytes; a second
//! database holds the schema version.

pub mod environment;
pub mod error;

pub use environment::{LmdbEnvironment, CURRENT_SCHEMA_VERSION};
pub use error::LmdbError;
