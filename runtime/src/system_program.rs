//! Native balances and account creation.

use serde::{Deserialize, Serialize};
use tipy_types::{Address, SYSTEM_PROGRAM_ID};

use crate::program::expect_accounts;
use crate::{AccountMeta, Instruction, InvocationContext, Program, ProgramError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemInstruction {
    /// Accounts: `[signer, writable]` source, `[writable]` destination.
    Transfer { amount: u64 },
    /// Accounts: `[signer, writable]` payer, `[signer, writable]` new account.
    CreateAccount { space: u64, owner: Address },
}

impl SystemInstruction {
    pub fn transfer(from: Address, to: Address, amount: u64) -> Instruction {
        Instruction {
            program_id: SYSTEM_PROGRAM_ID,
            accounts: vec![AccountMeta::new(from, true), AccountMeta::new(to, false)],
            data: encode(&Self::Transfer { amount }),
        }
    }

    pub fn create_account(payer: Address, new_account: Address, space: u64, owner: Address) -> Instruction {
        Instruction {
            program_id: SYSTEM_PROGRAM_ID,
            accounts: vec![
                AccountMeta::new(payer, true),
                AccountMeta::new(new_account, true),
            ],
            data: encode(&Self::CreateAccount { space, owner }),
        }
    }
}

fn encode(instruction: &SystemInstruction) -> Vec<u8> {
    // Encoding a plain enum of integers and addresses into a Vec cannot fail.
    bincode::serialize(instruction).unwrap_or_default()
}

pub struct SystemProgram;

impl Program for SystemProgram {
    fn process(
        &self,
        ctx: &mut InvocationContext<'_>,
        accounts: &[AccountMeta],
        data: &[u8],
    ) -> Result<(), ProgramError> {
        let instruction: SystemInstruction = bincode::deserialize(data)
            .map_err(|e| ProgramError::InvalidInstructionData(e.to_string()))?;
        expect_accounts(accounts, 2)?;
        let (first, second) = (accounts[0].address, accounts[1].address);
        match instruction {
            SystemInstruction::Transfer { amount } => ctx.transfer_native(&first, &second, amount),
            SystemInstruction::CreateAccount { space, owner } => {
                let space = usize::try_from(space)
                    .map_err(|_| ProgramError::InvalidInstructionData("space out of range".into()))?;
                ctx.allocate(&first, &second, space, &owner, &[])
            }
        }
    }
}
