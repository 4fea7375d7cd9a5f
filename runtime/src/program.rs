//! The seam between the host and the programs it runs.

use crate::{AccountMeta, InvocationContext, ProgramError};

/// A program the bank can dispatch instructions to.
pub trait Program: Send + Sync {
    fn process(
        &self,
        ctx: &mut InvocationContext<'_>,
        accounts: &[AccountMeta],
        data: &[u8],
    ) -> Result<(), ProgramError>;
}

/// Fail with `NotEnoughAccountKeys` unless at least `needed` accounts were passed.
pub fn expect_accounts(accounts: &[AccountMeta], needed: usize) -> Result<(), ProgramError> {
    if accounts.len() < needed {
        return Err(ProgramError::NotEnoughAccountKeys {
            needed,
            got: accounts.len(),
        });
    }
    Ok(())
}
