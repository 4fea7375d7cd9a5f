//! Fundamental types for the tipy tip ledger.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! addresses, key material, timestamps and the clock capability, rent, and the
//! well-known program identifiers.

pub mod address;
pub mod error;
pub mod ids;
pub mod keys;
pub mod rent;
pub mod time;

pub use address::Address;
pub use error::TypesError;
pub use ids::{NATIVE_MINT, SYSTEM_PROGRAM_ID, TIPY_PROGRAM_ID, TOKEN_PROGRAM_ID};
pub use keys::{KeyPair, PrivateKey, Signature};
pub use rent::Rent;
pub use time::{Clock, ClockError, SystemClock, UnixTimestamp};
