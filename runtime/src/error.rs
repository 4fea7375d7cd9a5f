use thiserror::Error;
use tipy_store::StoreError;
use tipy_token::TokenError;
use tipy_types::Address;

/// Failures of the native-balance subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SystemError {
    #[error("insufficient lamports: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    #[error("account {0} already in use")]
    AccountAlreadyInUse(Address),

    #[error("transfer source {0} must not carry data")]
    FromMustNotCarryData(Address),

    #[error("account {0} is not owned by the system program")]
    InvalidAccountOwner(Address),

    #[error("requested space {0} exceeds the maximum account size")]
    InvalidSpace(usize),

    #[error("arithmetic overflow in lamport computation")]
    Overflow,
}

/// Why a single instruction failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    /// A program-defined error code.
    #[error("custom program error: {0}")]
    Custom(u32),

    #[error("system error: {0}")]
    System(#[from] SystemError),

    #[error("token error: {0}")]
    Token(#[from] TokenError),

    #[error("missing required signature for {0}")]
    MissingRequiredSignature(Address),

    #[error("account {0} is not writable")]
    AccountNotWritable(Address),

    #[error("account {0} is not part of this transaction")]
    MissingAccount(Address),

    #[error("not enough account keys: need {needed}, got {got}")]
    NotEnoughAccountKeys { needed: usize, got: usize },

    #[error("incorrect program id for account {0}")]
    IncorrectProgramId(Address),

    #[error("account {0} is not owned by the expected program")]
    IllegalOwner(Address),

    #[error("seeds do not derive {0}")]
    InvalidSeeds(Address),

    #[error("invalid instruction data: {0}")]
    InvalidInstructionData(String),

    #[error("invalid data in account {address}: {reason}")]
    InvalidAccountData { address: Address, reason: String },
}

/// Why a transaction was rejected. Nothing it staged was committed.
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("transaction has no instructions")]
    Empty,

    #[error("missing signature for {0}")]
    MissingSignature(Address),

    #[error("invalid signature for {0}")]
    InvalidSignature(Address),

    #[error("program {0} not found")]
    ProgramNotFound(Address),

    #[error("instruction {index} failed: {error}")]
    InstructionError { index: usize, error: ProgramError },

    #[error("balance overflow for {0}")]
    BalanceOverflow(Address),

    #[error("message encoding error: {0}")]
    Encoding(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl TransactionError {
    /// The failing instruction's error, if an instruction failed.
    pub fn instruction_error(&self) -> Option<&ProgramError> {
        match self {
            Self::InstructionError { error, .. } => Some(error),
            _ => None,
        }
    }

    /// The program-defined error code, if an instruction failed with one.
    pub fn custom_code(&self) -> Option<u32> {
        match self.instruction_error() {
            Some(ProgramError::Custom(code)) => Some(*code),
            _ => None,
        }
    }
}
