use thiserror::Error;
use tipy_runtime::ProgramError;

/// Stable error codes surfaced to callers verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[repr(u32)]
pub enum TipError {
    #[error("Message exceeds 100 character limit")]
    MessageTooLong = 6000,

    #[error("Insufficient funds for transfer")]
    InsufficientFunds = 6001,

    #[error("Invalid token account")]
    InvalidTokenAccount = 6002,

    #[error("Receiver token account not initialized")]
    ReceiverTokenAccountNotInitialized = 6003,

    #[error("Clock error")]
    ClockError = 6004,
}

impl TipError {
    pub const ALL: [TipError; 5] = [
        Self::MessageTooLong,
        Self::InsufficientFunds,
        Self::InvalidTokenAccount,
        Self::ReceiverTokenAccountNotInitialized,
        Self::ClockError,
    ];

    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.code() == code)
    }
}

impl From<TipError> for ProgramError {
    fn from(e: TipError) -> Self {
        ProgramError::Custom(e.code())
    }
}

/// Failure to read a ledger entry back out of account data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("account data is not a ledger entry")]
    WrongDiscriminator,

    #[error("malformed ledger entry: {0}")]
    Malformed(String),

    #[error("ledger entry needs {needed} bytes, slot has {available}")]
    DoesNotFit { needed: usize, available: usize },
}
