//! Runs one tip through validation, transfer and recording.

use tipy_runtime::{AccountMeta, InvocationContext, ProgramError};
use tracing::debug;

use crate::instruction::TipAccounts;
use crate::state::LedgerEntry;
use crate::{engine, record, validator};

/// Where a tip is in its lifecycle. Any stage can end in failure, and a
/// failure discards everything earlier stages staged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Received,
    Validated,
    Transferred,
    Recorded,
}

pub fn send_tip(
    ctx: &mut InvocationContext<'_>,
    accounts: &[AccountMeta],
    amount: u64,
    message: String,
) -> Result<LedgerEntry, ProgramError> {
    let accounts = TipAccounts::from_metas(accounts).map_err(|e| failed(Stage::Received, e))?;
    debug!(stage = ?Stage::Received, sender = %accounts.sender, receiver = %accounts.receiver, amount);

    let transfer =
        validator::validate(ctx, accounts, amount, message).map_err(|e| failed(Stage::Received, e))?;
    debug!(stage = ?Stage::Validated, kind = ?transfer.kind);

    engine::execute(ctx, &transfer).map_err(|e| failed(Stage::Validated, e))?;
    debug!(stage = ?Stage::Transferred);

    let entry = record::write_entry(ctx, &transfer).map_err(|e| failed(Stage::Transferred, e))?;
    debug!(stage = ?Stage::Recorded, entry = %transfer.accounts.ledger_entry, timestamp = entry.timestamp);
    Ok(entry)
}

fn failed(stage: Stage, error: ProgramError) -> ProgramError {
    debug!(?stage, %error, "tip failed");
    error
}
