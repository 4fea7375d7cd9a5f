//! The tipy program.
//!
//! `send_tip` moves native currency or a token from a sender to a receiver and
//! writes an immutable [`LedgerEntry`] at an address derived from
//! `"tip_transaction"`, the sender and the receiver. Validation, transfer and
//! recording run inside one transaction of the host, so a failure at any
//! stage leaves no trace.
//!
//! Failures the caller can act on carry the stable codes of [`TipError`].

pub mod engine;
pub mod error;
pub mod instruction;
pub mod processor;
pub mod record;
pub mod state;
pub mod validator;

use std::sync::Arc;

use tipy_runtime::{AccountMeta, Bank, InvocationContext, Program, ProgramError};
use tipy_store::AccountStore;
use tipy_types::TIPY_PROGRAM_ID;

pub use error::{EntryError, TipError};
pub use instruction::{send_tip, TipAccounts, TipInstruction};
pub use processor::Stage;
pub use state::{entry_address, LedgerEntry, ENTRY_SEED, MAX_MESSAGE_LEN};
pub use validator::TransferKind;

pub struct TipyProgram;

impl Program for TipyProgram {
    fn process(
        &self,
        ctx: &mut InvocationContext<'_>,
        accounts: &[AccountMeta],
        data: &[u8],
    ) -> Result<(), ProgramError> {
        match TipInstruction::unpack(data)? {
            TipInstruction::SendTip { amount, message } => {
                processor::send_tip(ctx, accounts, amount, message).map(|_| ())
            }
        }
    }
}

/// Register the tipy program with a bank under its well-known id.
pub fn install<S: AccountStore>(bank: &mut Bank<S>) {
    bank.register_program(TIPY_PROGRAM_ID, Arc::new(TipyProgram));
}
