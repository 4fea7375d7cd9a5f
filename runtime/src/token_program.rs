//! Host program for the token subsystem.

use serde::{Deserialize, Serialize};
use tipy_token::{initialize_account, initialize_mint, mint_to, Mint, TokenAccount};
use tipy_types::{Address, TOKEN_PROGRAM_ID};

use crate::program::expect_accounts;
use crate::{AccountMeta, Instruction, InvocationContext, Program, ProgramError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenInstruction {
    /// Accounts: `[writable]` mint, created beforehand with `Mint::LEN` bytes.
    InitializeMint { decimals: u8, mint_authority: Address },
    /// Accounts: `[writable]` token account, `[]` mint.
    InitializeAccount { owner: Address },
    /// Accounts: `[writable]` mint, `[writable]` destination, `[signer]` authority.
    MintTo { amount: u64 },
    /// Accounts: `[writable]` source, `[writable]` destination, `[signer]` owner.
    Transfer { amount: u64 },
}

impl TokenInstruction {
    pub fn initialize_mint(mint: Address, mint_authority: Address, decimals: u8) -> Instruction {
        Self::InitializeMint {
            decimals,
            mint_authority,
        }
        .into_instruction(vec![AccountMeta::new(mint, false)])
    }

    pub fn initialize_account(account: Address, mint: Address, owner: Address) -> Instruction {
        Self::InitializeAccount { owner }.into_instruction(vec![
            AccountMeta::new(account, false),
            AccountMeta::new_readonly(mint, false),
        ])
    }

    pub fn mint_to(mint: Address, destination: Address, authority: Address, amount: u64) -> Instruction {
        Self::MintTo { amount }.into_instruction(vec![
            AccountMeta::new(mint, false),
            AccountMeta::new(destination, false),
            AccountMeta::new_readonly(authority, true),
        ])
    }

    pub fn transfer(source: Address, destination: Address, owner: Address, amount: u64) -> Instruction {
        Self::Transfer { amount }.into_instruction(vec![
            AccountMeta::new(source, false),
            AccountMeta::new(destination, false),
            AccountMeta::new_readonly(owner, true),
        ])
    }

    fn into_instruction(self, accounts: Vec<AccountMeta>) -> Instruction {
        Instruction {
            program_id: TOKEN_PROGRAM_ID,
            accounts,
            data: bincode::serialize(&self).unwrap_or_default(),
        }
    }
}

pub struct TokenProgram;

impl TokenProgram {
    fn token_data<'c>(ctx: &'c InvocationContext<'_>, address: &Address) -> Result<&'c [u8], ProgramError> {
        let account = ctx.account(address)?;
        if account.owner != TOKEN_PROGRAM_ID {
            return Err(ProgramError::IllegalOwner(*address));
        }
        Ok(&account.data)
    }
}

impl Program for TokenProgram {
    fn process(
        &self,
        ctx: &mut InvocationContext<'_>,
        accounts: &[AccountMeta],
        data: &[u8],
    ) -> Result<(), ProgramError> {
        let instruction: TokenInstruction = bincode::deserialize(data)
            .map_err(|e| ProgramError::InvalidInstructionData(e.to_string()))?;
        match instruction {
            TokenInstruction::InitializeMint {
                decimals,
                mint_authority,
            } => {
                expect_accounts(accounts, 1)?;
                let data = ctx.account_data_mut(&accounts[0].address)?;
                initialize_mint(data, mint_authority, decimals)?;
            }
            TokenInstruction::InitializeAccount { owner } => {
                expect_accounts(accounts, 2)?;
                let (account, mint) = (accounts[0].address, accounts[1].address);
                let mint_data = Self::token_data(ctx, &mint)?.to_vec();
                let data = ctx.account_data_mut(&account)?;
                initialize_account(data, &mint, &mint_data, owner)?;
            }
            TokenInstruction::MintTo { amount } => {
                expect_accounts(accounts, 3)?;
                let (mint_address, destination, authority) =
                    (accounts[0].address, accounts[1].address, accounts[2].address);
                if !ctx.is_signer(&authority) {
                    return Err(ProgramError::MissingRequiredSignature(authority));
                }
                let mut mint = Mint::unpack_unchecked(Self::token_data(ctx, &mint_address)?)?;
                let mut holder = TokenAccount::unpack_unchecked(Self::token_data(ctx, &destination)?)?;
                mint_to(&mut mint, &mint_address, &mut holder, &authority, amount)?;
                mint.pack_into(ctx.account_data_mut(&mint_address)?)?;
                holder.pack_into(ctx.account_data_mut(&destination)?)?;
            }
            TokenInstruction::Transfer { amount } => {
                expect_accounts(accounts, 3)?;
                let (source, destination, owner) =
                    (accounts[0].address, accounts[1].address, accounts[2].address);
                let mint = TokenAccount::unpack_unchecked(Self::token_data(ctx, &source)?)?.mint;
                ctx.transfer_token(&mint, &source, &destination, amount, &owner)?;
            }
        }
        Ok(())
    }
}
