//! Token-specific errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("insufficient token balance: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    #[error("account mint does not match")]
    MintMismatch,

    #[error("owner does not match")]
    OwnerMismatch,

    #[error("account is frozen")]
    AccountFrozen,

    #[error("state is uninitialized")]
    UninitializedState,

    #[error("account or mint already initialized")]
    AlreadyInUse,

    #[error("invalid account data: {0}")]
    InvalidAccountData(String),

    #[error("arithmetic overflow in token computation")]
    Overflow,
}
