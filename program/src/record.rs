//! Writes the ledger entry.

use tipy_runtime::{InvocationContext, ProgramError};
use tipy_types::TIPY_PROGRAM_ID;

use crate::state::{entry_seeds, LedgerEntry};
use crate::validator::ValidatedTransfer;

/// Allocate the pair's slot, funded by the sender, and fill in the entry.
///
/// An occupied slot fails the allocation with
/// `SystemError::AccountAlreadyInUse`.
pub fn write_entry(
    ctx: &mut InvocationContext<'_>,
    transfer: &ValidatedTransfer,
) -> Result<LedgerEntry, ProgramError> {
    let accounts = &transfer.accounts;
    let entry = LedgerEntry {
        sender: accounts.sender,
        receiver: accounts.receiver,
        amount: transfer.amount,
        message: transfer.message.clone(),
        timestamp: transfer.timestamp.as_secs(),
        is_native: transfer.kind.is_native(),
    };

    let seeds = entry_seeds(&accounts.sender, &accounts.receiver);
    ctx.allocate(
        &accounts.sender,
        &accounts.ledger_entry,
        LedgerEntry::SPACE,
        &TIPY_PROGRAM_ID,
        &seeds,
    )?;

    let data = ctx.account_data_mut(&accounts.ledger_entry)?;
    entry
        .write_to(data)
        .map_err(|e| ProgramError::InvalidAccountData {
            address: accounts.ledger_entry,
            reason: e.to_string(),
        })?;
    Ok(entry)
}
