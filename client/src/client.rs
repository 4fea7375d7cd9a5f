use std::sync::Arc;

use tipy_crypto::generate_keypair;
use tipy_program::{entry_address, send_tip, LedgerEntry, TipAccounts};
use tipy_runtime::{Bank, Instruction, SystemInstruction, TokenInstruction, Transaction};
use tipy_store::AccountStore;
use tipy_token::{Mint, TokenAccount};
use tipy_types::{Address, KeyPair, TIPY_PROGRAM_ID, TOKEN_PROGRAM_ID};
use tracing::debug;

use crate::history::{self, HistoryItem};
use crate::ClientError;

/// The token accounts a token tip moves between.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenRoute {
    pub mint: Address,
    pub sender_tokens: Address,
    pub receiver_tokens: Address,
}

pub struct TipClient<S> {
    bank: Arc<Bank<S>>,
}

impl<S> Clone for TipClient<S> {
    fn clone(&self) -> Self {
        Self {
            bank: Arc::clone(&self.bank),
        }
    }
}

impl<S: AccountStore> TipClient<S> {
    /// The bank must have the tipy program installed.
    pub fn new(bank: Arc<Bank<S>>) -> Self {
        Self { bank }
    }

    pub fn bank(&self) -> &Bank<S> {
        &self.bank
    }

    /// Tip native currency. Returns the address of the new ledger entry.
    pub fn send_native_tip(
        &self,
        sender: &KeyPair,
        receiver: &Address,
        amount: u64,
        message: &str,
    ) -> Result<Address, ClientError> {
        let accounts = TipAccounts::native(sender.public, *receiver)?;
        self.submit_tip(sender, &accounts, amount, message)
    }

    /// Tip tokens of `route.mint`. Returns the address of the new ledger entry.
    pub fn send_token_tip(
        &self,
        sender: &KeyPair,
        receiver: &Address,
        route: &TokenRoute,
        amount: u64,
        message: &str,
    ) -> Result<Address, ClientError> {
        let accounts = TipAccounts::token(
            sender.public,
            *receiver,
            route.mint,
            route.sender_tokens,
            route.receiver_tokens,
        )?;
        self.submit_tip(sender, &accounts, amount, message)
    }

    fn submit_tip(
        &self,
        sender: &KeyPair,
        accounts: &TipAccounts,
        amount: u64,
        message: &str,
    ) -> Result<Address, ClientError> {
        let ix = send_tip(accounts, amount, message)?;
        self.submit(vec![ix], &[sender])?;
        debug!(entry = %accounts.ledger_entry, amount, "tip sent");
        Ok(accounts.ledger_entry)
    }

    /// The entry for the ordered pair, if that pair has tipped.
    pub fn entry(&self, sender: &Address, receiver: &Address) -> Result<Option<LedgerEntry>, ClientError> {
        let address = entry_address(sender, receiver)?;
        self.entry_at(&address)
    }

    pub fn entry_at(&self, address: &Address) -> Result<Option<LedgerEntry>, ClientError> {
        let Some(account) = self.bank.get_account(address)? else {
            return Ok(None);
        };
        LedgerEntry::decode(&account.data)
            .map(Some)
            .map_err(|source| ClientError::Entry {
                address: *address,
                source,
            })
    }

    /// Every entry `wallet` sent or received, newest first.
    pub fn history(&self, wallet: &Address) -> Result<Vec<HistoryItem>, ClientError> {
        let mut entries = Vec::new();
        for (address, account) in self.bank.accounts_owned_by(&TIPY_PROGRAM_ID)? {
            if !LedgerEntry::is_entry(&account.data) {
                continue;
            }
            let entry = LedgerEntry::decode(&account.data)
                .map_err(|source| ClientError::Entry { address, source })?;
            entries.push((address, entry));
        }
        Ok(history::collect(wallet, entries))
    }

    /// Create and initialize a mint with `authority` as its issuer.
    pub fn create_mint(&self, authority: &KeyPair, decimals: u8) -> Result<Address, ClientError> {
        let mint = generate_keypair();
        self.submit(
            vec![
                SystemInstruction::create_account(
                    authority.public,
                    mint.public,
                    Mint::LEN as u64,
                    TOKEN_PROGRAM_ID,
                ),
                TokenInstruction::initialize_mint(mint.public, authority.public, decimals),
            ],
            &[authority, &mint],
        )?;
        Ok(mint.public)
    }

    /// Create and initialize a token account of `mint` for `owner`, paid by `payer`.
    pub fn create_token_account(
        &self,
        payer: &KeyPair,
        mint: &Address,
        owner: &Address,
    ) -> Result<Address, ClientError> {
        let account = generate_keypair();
        self.submit(
            vec![
                SystemInstruction::create_account(
                    payer.public,
                    account.public,
                    TokenAccount::LEN as u64,
                    TOKEN_PROGRAM_ID,
                ),
                TokenInstruction::initialize_account(account.public, *mint, *owner),
            ],
            &[payer, &account],
        )?;
        Ok(account.public)
    }

    pub fn mint_to(
        &self,
        authority: &KeyPair,
        mint: &Address,
        destination: &Address,
        amount: u64,
    ) -> Result<(), ClientError> {
        self.submit(
            vec![TokenInstruction::mint_to(*mint, *destination, authority.public, amount)],
            &[authority],
        )
    }

    pub fn token_balance(&self, address: &Address) -> Result<u64, ClientError> {
        let account = self
            .bank
            .get_account(address)?
            .ok_or(ClientError::AccountNotFound(*address))?;
        TokenAccount::unpack(&account.data)
            .map(|state| state.amount)
            .map_err(|source| ClientError::TokenAccount {
                address: *address,
                source,
            })
    }

    pub fn balance(&self, address: &Address) -> Result<u64, ClientError> {
        Ok(self.bank.balance(address)?)
    }

    fn submit(&self, instructions: Vec<Instruction>, signers: &[&KeyPair]) -> Result<(), ClientError> {
        let tx = Transaction::new_signed(instructions, signers)?;
        self.bank.process_transaction(&tx)?;
        Ok(())
    }
}
