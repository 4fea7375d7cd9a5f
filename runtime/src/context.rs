//! The staged view of accounts a transaction executes against.
//!
//! Nothing a program does through an [`InvocationContext`] reaches the store
//! directly. The bank collects [`InvocationContext::write_set`] after every
//! instruction succeeded and commits it in one step; on any failure the
//! context is dropped and the store is untouched.

use std::collections::{BTreeMap, BTreeSet};

use tipy_crypto::derive_program_address;
use tipy_store::{Account, WriteSet};
use tipy_token::{check_transfer, TokenAccount};
use tipy_types::{Address, Clock, ClockError, Rent, UnixTimestamp, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID};

use crate::{ProgramError, SystemError};

/// Largest data allocation a single account may hold.
pub const MAX_PERMITTED_DATA_LENGTH: usize = 10 * 1024 * 1024;

pub struct InvocationContext<'a> {
    accounts: BTreeMap<Address, Account>,
    originals: BTreeMap<Address, Option<Account>>,
    signers: BTreeSet<Address>,
    writable: BTreeSet<Address>,
    program_id: Address,
    rent: Rent,
    clock: &'a dyn Clock,
}

impl<'a> InvocationContext<'a> {
    /// Stage `loaded` accounts. An address with no stored account is staged
    /// as an empty system wallet.
    pub fn new(
        loaded: Vec<(Address, Option<Account>)>,
        signers: impl IntoIterator<Item = Address>,
        writable: impl IntoIterator<Item = Address>,
        rent: Rent,
        clock: &'a dyn Clock,
    ) -> Self {
        let accounts = loaded
            .iter()
            .map(|(address, account)| (*address, account.clone().unwrap_or_default()))
            .collect();
        Self {
            accounts,
            originals: loaded.into_iter().collect(),
            signers: signers.into_iter().collect(),
            writable: writable.into_iter().collect(),
            program_id: Address::DEFAULT,
            rent,
            clock,
        }
    }

    /// The program whose instruction is executing.
    pub fn program_id(&self) -> &Address {
        &self.program_id
    }

    pub(crate) fn set_program_id(&mut self, program_id: Address) {
        self.program_id = program_id;
    }

    pub fn rent(&self) -> &Rent {
        &self.rent
    }

    /// Trusted wall-clock time.
    pub fn now(&self) -> Result<UnixTimestamp, ClockError> {
        self.clock.now()
    }

    pub fn is_signer(&self, address: &Address) -> bool {
        self.signers.contains(address)
    }

    pub fn is_writable(&self, address: &Address) -> bool {
        self.writable.contains(address)
    }

    pub fn account(&self, address: &Address) -> Result<&Account, ProgramError> {
        self.accounts
            .get(address)
            .ok_or(ProgramError::MissingAccount(*address))
    }

    /// Mutable data of an account the executing program owns.
    pub fn account_data_mut(&mut self, address: &Address) -> Result<&mut Vec<u8>, ProgramError> {
        self.require_writable(address)?;
        let program_id = self.program_id;
        let account = self.staged_mut(address)?;
        if account.owner != program_id {
            return Err(ProgramError::IllegalOwner(*address));
        }
        Ok(&mut account.data)
    }

    /// Move native balance from a signing system wallet.
    ///
    /// The source must keep at least the rent minimum for an empty account.
    /// A transfer to itself passes the same checks and changes nothing.
    pub fn transfer_native(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> Result<(), ProgramError> {
        self.require_signer(from)?;
        self.require_writable(from)?;
        self.require_writable(to)?;
        self.debit_wallet(from, amount)?;
        let destination = self.staged_mut(to)?;
        destination.lamports = destination
            .lamports
            .checked_add(amount)
            .ok_or(SystemError::Overflow)?;
        Ok(())
    }

    /// Move `amount` of `mint` between two token accounts, authorized by the
    /// source's owner.
    pub fn transfer_token(
        &mut self,
        mint: &Address,
        from: &Address,
        to: &Address,
        amount: u64,
        authority: &Address,
    ) -> Result<(), ProgramError> {
        self.require_signer(authority)?;
        self.require_writable(from)?;
        self.require_writable(to)?;
        let mut source = self.load_token_account(from)?;
        if from == to {
            check_transfer(&source, &source, mint, authority, amount)?;
            return Ok(());
        }
        let mut destination = self.load_token_account(to)?;
        tipy_token::transfer(&mut source, &mut destination, mint, authority, amount)?;
        self.store_token_account(from, &source)?;
        self.store_token_account(to, &destination)
    }

    /// Create `address` with `space` zeroed bytes owned by `owner`, funded with
    /// the rent minimum by `payer`.
    ///
    /// `address` must either sign or be the address `seeds` derive under the
    /// executing program. The slot must be unused.
    pub fn allocate(
        &mut self,
        payer: &Address,
        address: &Address,
        space: usize,
        owner: &Address,
        seeds: &[&[u8]],
    ) -> Result<(), ProgramError> {
        if space > MAX_PERMITTED_DATA_LENGTH {
            return Err(SystemError::InvalidSpace(space).into());
        }
        if !self.is_signer(address) {
            if seeds.is_empty() {
                return Err(ProgramError::MissingRequiredSignature(*address));
            }
            let derived = derive_program_address(seeds, &self.program_id)
                .map_err(|_| ProgramError::InvalidSeeds(*address))?;
            if derived != *address {
                return Err(ProgramError::InvalidSeeds(*address));
            }
        }
        self.require_signer(payer)?;
        self.require_writable(payer)?;
        self.require_writable(address)?;

        let target = self.account(address)?;
        if !target.is_empty() || target.owner != SYSTEM_PROGRAM_ID {
            return Err(SystemError::AccountAlreadyInUse(*address).into());
        }

        let lamports = self.rent.minimum_balance(space);
        self.debit_wallet(payer, lamports)?;
        let target = self.staged_mut(address)?;
        target.lamports = lamports;
        target.owner = *owner;
        target.data = vec![0; space];
        Ok(())
    }

    /// Writable accounts whose staged state differs from what was loaded.
    ///
    /// An account left with no lamports and no data is deleted.
    pub fn write_set(&self) -> WriteSet {
        let mut writes = WriteSet::new();
        for address in &self.writable {
            let (Some(current), Some(original)) =
                (self.accounts.get(address), self.originals.get(address))
            else {
                continue;
            };
            if current.is_empty() {
                if original.is_some() {
                    writes.push((*address, None));
                }
            } else if original.as_ref() != Some(current) {
                writes.push((*address, Some(current.clone())));
            }
        }
        writes
    }

    fn require_signer(&self, address: &Address) -> Result<(), ProgramError> {
        if !self.is_signer(address) {
            return Err(ProgramError::MissingRequiredSignature(*address));
        }
        Ok(())
    }

    fn require_writable(&self, address: &Address) -> Result<(), ProgramError> {
        if !self.accounts.contains_key(address) {
            return Err(ProgramError::MissingAccount(*address));
        }
        if !self.is_writable(address) {
            return Err(ProgramError::AccountNotWritable(*address));
        }
        Ok(())
    }

    fn staged_mut(&mut self, address: &Address) -> Result<&mut Account, ProgramError> {
        self.accounts
            .get_mut(address)
            .ok_or(ProgramError::MissingAccount(*address))
    }

    fn debit_wallet(&mut self, from: &Address, amount: u64) -> Result<(), ProgramError> {
        let retained = self.rent.minimum_balance(0);
        let account = self.staged_mut(from)?;
        if account.owner != SYSTEM_PROGRAM_ID {
            return Err(SystemError::InvalidAccountOwner(*from).into());
        }
        if !account.data.is_empty() {
            return Err(SystemError::FromMustNotCarryData(*from).into());
        }
        let needed = amount.checked_add(retained).ok_or(SystemError::Overflow)?;
        if account.lamports < needed {
            return Err(SystemError::InsufficientFunds {
                needed,
                available: account.lamports,
            }
            .into());
        }
        account.lamports -= amount;
        Ok(())
    }

    fn load_token_account(&self, address: &Address) -> Result<TokenAccount, ProgramError> {
        let account = self.account(address)?;
        if account.owner != TOKEN_PROGRAM_ID {
            return Err(ProgramError::IllegalOwner(*address));
        }
        Ok(TokenAccount::unpack_unchecked(&account.data)?)
    }

    fn store_token_account(
        &mut self,
        address: &Address,
        state: &TokenAccount,
    ) -> Result<(), ProgramError> {
        let account = self.staged_mut(address)?;
        state.pack_into(&mut account.data)?;
        Ok(())
    }
}
