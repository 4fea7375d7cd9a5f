//! Checks that run before anything moves.
//!
//! Account shape first, then the rule list in the order callers observe:
//! message length, balance-account and mint consistency, receiver
//! initialization, clock availability. Nothing here mutates state.

use tipy_runtime::{InvocationContext, ProgramError};
use tipy_store::Account;
use tipy_token::TokenAccount;
use tipy_types::{Address, UnixTimestamp, NATIVE_MINT, TOKEN_PROGRAM_ID};

use crate::instruction::TipAccounts;
use crate::state::{entry_address, MAX_MESSAGE_LEN};
use crate::TipError;

/// What kind of value a tip moves. Decided once, from the mint account.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferKind {
    Native,
    Token { mint: Address },
}

impl TransferKind {
    pub fn from_mint(mint: Address) -> Self {
        if mint == NATIVE_MINT {
            Self::Native
        } else {
            Self::Token { mint }
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }
}

/// A tip that passed every check, with the clock reading it will record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedTransfer {
    pub accounts: TipAccounts,
    pub kind: TransferKind,
    pub amount: u64,
    pub message: String,
    pub timestamp: UnixTimestamp,
}

pub fn validate(
    ctx: &InvocationContext<'_>,
    accounts: TipAccounts,
    amount: u64,
    message: String,
) -> Result<ValidatedTransfer, ProgramError> {
    check_shape(ctx, &accounts)?;

    if message.len() > MAX_MESSAGE_LEN {
        return Err(TipError::MessageTooLong.into());
    }

    let kind = TransferKind::from_mint(accounts.mint);
    if let TransferKind::Token { mint } = kind {
        check_sender_balance(ctx, &accounts, &mint)?;
        check_receiver_balance(ctx, &accounts.receiver_balance, &mint)?;
    }

    let timestamp = ctx.now().map_err(|_| TipError::ClockError)?;

    Ok(ValidatedTransfer {
        accounts,
        kind,
        amount,
        message,
        timestamp,
    })
}

fn check_shape(ctx: &InvocationContext<'_>, accounts: &TipAccounts) -> Result<(), ProgramError> {
    if !ctx.is_signer(&accounts.sender) {
        return Err(ProgramError::MissingRequiredSignature(accounts.sender));
    }
    for address in [
        &accounts.ledger_entry,
        &accounts.sender,
        &accounts.receiver,
        &accounts.sender_balance,
        &accounts.receiver_balance,
    ] {
        if !ctx.is_writable(address) {
            return Err(ProgramError::AccountNotWritable(*address));
        }
    }
    let expected = entry_address(&accounts.sender, &accounts.receiver)
        .map_err(|_| ProgramError::InvalidSeeds(accounts.ledger_entry))?;
    if accounts.ledger_entry != expected {
        return Err(ProgramError::InvalidSeeds(accounts.ledger_entry));
    }
    Ok(())
}

/// The sender's balance account must be an initialized token account of
/// `mint` that the sender owns.
fn check_sender_balance(
    ctx: &InvocationContext<'_>,
    accounts: &TipAccounts,
    mint: &Address,
) -> Result<(), TipError> {
    let account = ctx
        .account(&accounts.sender_balance)
        .map_err(|_| TipError::InvalidTokenAccount)?;
    match token_state(account)? {
        Some(state) if state.mint == *mint && state.owner == accounts.sender => Ok(()),
        _ => Err(TipError::InvalidTokenAccount),
    }
}

fn check_receiver_balance(
    ctx: &InvocationContext<'_>,
    address: &Address,
    mint: &Address,
) -> Result<(), TipError> {
    let account = ctx
        .account(address)
        .map_err(|_| TipError::InvalidTokenAccount)?;
    match token_state(account)? {
        Some(state) if state.mint != *mint => Err(TipError::InvalidTokenAccount),
        Some(_) => Ok(()),
        None => Err(TipError::ReceiverTokenAccountNotInitialized),
    }
}

/// `None` for an account that holds no initialized token state: no data at
/// all, or token-owned but still zeroed. Data owned by another program, or
/// token data that does not decode, is an invalid token account.
fn token_state(account: &Account) -> Result<Option<TokenAccount>, TipError> {
    if account.data.is_empty() {
        return Ok(None);
    }
    if account.owner != TOKEN_PROGRAM_ID {
        return Err(TipError::InvalidTokenAccount);
    }
    let state =
        TokenAccount::unpack_unchecked(&account.data).map_err(|_| TipError::InvalidTokenAccount)?;
    Ok(state.is_initialized().then_some(state))
}
