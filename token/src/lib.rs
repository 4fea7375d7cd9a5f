//! Fungible tokens.
//!
//! A **mint** defines a token type (supply, decimals, who may issue). A
//! **token account** holds one owner's balance of one mint. Both live in the
//! data of accounts owned by the token program; this crate owns their byte
//! layout and the rules for issuing and moving balances. Loading and storing
//! the accounts is the runtime's job.

pub mod engine;
pub mod error;
pub mod state;

pub use engine::{check_transfer, initialize_account, initialize_mint, mint_to, transfer};
pub use error::TokenError;
pub use state::{AccountState, Mint, TokenAccount};
