use thiserror::Error;
use tipy_crypto::CryptoError;
use tipy_program::{EntryError, TipError};
use tipy_runtime::{ProgramError, TransactionError};
use tipy_token::TokenError;
use tipy_types::Address;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transaction rejected: {0}")]
    Transaction(#[from] TransactionError),

    #[error("could not build instruction: {0}")]
    Instruction(#[from] ProgramError),

    #[error("address derivation failed: {0}")]
    Crypto(#[from] CryptoError),

    #[error("ledger entry at {address} is unreadable: {source}")]
    Entry { address: Address, source: EntryError },

    #[error("{address} is not a token account: {source}")]
    TokenAccount { address: Address, source: TokenError },

    #[error("account {0} does not exist")]
    AccountNotFound(Address),
}

impl ClientError {
    /// The tipy error code, if the program rejected the tip with one.
    pub fn tip_error(&self) -> Option<TipError> {
        match self {
            Self::Transaction(e) => e.custom_code().and_then(TipError::from_code),
            _ => None,
        }
    }
}
