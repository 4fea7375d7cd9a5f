//! Client for tipy.
//!
//! [`TipClient`] wraps a [`Bank`](tipy_runtime::Bank) with the tipy program
//! installed. It builds and signs `send_tip` transactions, reads entries back
//! from their derived addresses, and assembles a wallet's history by scanning
//! every account the program owns.

pub mod client;
pub mod error;
pub mod history;

pub use client::{TipClient, TokenRoute};
pub use error::ClientError;
pub use history::{Direction, HistoryItem};
