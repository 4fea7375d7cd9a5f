//! Moves the tipped value.

use tipy_runtime::{InvocationContext, ProgramError, SystemError};

use crate::validator::{TransferKind, ValidatedTransfer};
use crate::TipError;

/// Move exactly `transfer.amount` from sender to receiver.
///
/// Native shortfall surfaces as [`TipError::InsufficientFunds`]. Token
/// failures keep the token subsystem's error.
pub fn execute(ctx: &mut InvocationContext<'_>, transfer: &ValidatedTransfer) -> Result<(), ProgramError> {
    let accounts = &transfer.accounts;
    match transfer.kind {
        TransferKind::Native => ctx
            .transfer_native(&accounts.sender, &accounts.receiver, transfer.amount)
            .map_err(|e| match e {
                ProgramError::System(SystemError::InsufficientFunds { .. }) => {
                    TipError::InsufficientFunds.into()
                }
                other => other,
            }),
        TransferKind::Token { mint } => ctx.transfer_token(
            &mint,
            &accounts.sender_balance,
            &accounts.receiver_balance,
            transfer.amount,
            &accounts.sender,
        ),
    }
}
