//! The `send_tip` instruction and its ordered account set.

use serde::{Deserialize, Serialize};
use tipy_crypto::CryptoError;
use tipy_runtime::{AccountMeta, Instruction, ProgramError};
use tipy_types::{Address, NATIVE_MINT, SYSTEM_PROGRAM_ID, TIPY_PROGRAM_ID, TOKEN_PROGRAM_ID};

use crate::state::entry_address;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TipInstruction {
    SendTip { amount: u64, message: String },
}

impl TipInstruction {
    pub fn unpack(data: &[u8]) -> Result<Self, ProgramError> {
        bincode::deserialize(data).map_err(|e| ProgramError::InvalidInstructionData(e.to_string()))
    }

    pub fn pack(&self) -> Result<Vec<u8>, ProgramError> {
        bincode::serialize(self).map_err(|e| ProgramError::InvalidInstructionData(e.to_string()))
    }
}

/// Number of accounts `send_tip` takes.
pub const SEND_TIP_ACCOUNTS: usize = 8;

/// The accounts of one `send_tip`, in instruction order.
///
/// | # | account | access |
/// |---|---|---|
/// | 0 | ledger-entry slot | writable |
/// | 1 | mint (`NATIVE_MINT` for native) | read-only |
/// | 2 | sender | signer, writable |
/// | 3 | receiver | writable |
/// | 4 | sender balance account | writable |
/// | 5 | receiver balance account | writable |
/// | 6 | system program | read-only |
/// | 7 | token program | read-only |
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TipAccounts {
    pub ledger_entry: Address,
    pub mint: Address,
    pub sender: Address,
    pub receiver: Address,
    pub sender_balance: Address,
    pub receiver_balance: Address,
}

impl TipAccounts {
    /// Native tip. The wallets stand in as their own balance accounts.
    pub fn native(sender: Address, receiver: Address) -> Result<Self, CryptoError> {
        Ok(Self {
            ledger_entry: entry_address(&sender, &receiver)?,
            mint: NATIVE_MINT,
            sender,
            receiver,
            sender_balance: sender,
            receiver_balance: receiver,
        })
    }

    pub fn token(
        sender: Address,
        receiver: Address,
        mint: Address,
        sender_balance: Address,
        receiver_balance: Address,
    ) -> Result<Self, CryptoError> {
        Ok(Self {
            ledger_entry: entry_address(&sender, &receiver)?,
            mint,
            sender,
            receiver,
            sender_balance,
            receiver_balance,
        })
    }

    /// Read the account set back out of instruction metas, checking the
    /// count and both program references.
    pub fn from_metas(accounts: &[AccountMeta]) -> Result<Self, ProgramError> {
        if accounts.len() < SEND_TIP_ACCOUNTS {
            return Err(ProgramError::NotEnoughAccountKeys {
                needed: SEND_TIP_ACCOUNTS,
                got: accounts.len(),
            });
        }
        if accounts[6].address != SYSTEM_PROGRAM_ID {
            return Err(ProgramError::IncorrectProgramId(accounts[6].address));
        }
        if accounts[7].address != TOKEN_PROGRAM_ID {
            return Err(ProgramError::IncorrectProgramId(accounts[7].address));
        }
        Ok(Self {
            ledger_entry: accounts[0].address,
            mint: accounts[1].address,
            sender: accounts[2].address,
            receiver: accounts[3].address,
            sender_balance: accounts[4].address,
            receiver_balance: accounts[5].address,
        })
    }

    pub fn to_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.ledger_entry, false),
            AccountMeta::new_readonly(self.mint, false),
            AccountMeta::new(self.sender, true),
            AccountMeta::new(self.receiver, false),
            AccountMeta::new(self.sender_balance, false),
            AccountMeta::new(self.receiver_balance, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
        ]
    }
}

/// Build a `send_tip` instruction for the tipy program.
pub fn send_tip(
    accounts: &TipAccounts,
    amount: u64,
    message: impl Into<String>,
) -> Result<Instruction, ProgramError> {
    let data = TipInstruction::SendTip {
        amount,
        message: message.into(),
    }
    .pack()?;
    Ok(Instruction {
        program_id: TIPY_PROGRAM_ID,
        accounts: accounts.to_metas(),
        data,
    })
}
