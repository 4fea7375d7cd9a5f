//! Abstract account storage for tipy.
//!
//! Every storage backend (LMDB, in-memory for testing) implements
//! [`AccountStore`]. The runtime depends only on the trait.

pub mod account;
pub mod error;

pub use account::{Account, AccountStore, WriteSet};
pub use error::StoreError;
