//! Executes transactions against an account store.

use std::collections::HashMap;
use std::sync::Arc;

use tipy_store::{Account, AccountStore, StoreError};
use tipy_types::{Address, Clock, Rent, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID};
use tracing::{debug, info, warn};

use crate::{
    AccountLocks, InvocationContext, Program, SystemProgram, TokenProgram, Transaction,
    TransactionError,
};

pub struct Bank<S> {
    store: S,
    clock: Arc<dyn Clock>,
    rent: Rent,
    locks: AccountLocks,
    programs: HashMap<Address, Arc<dyn Program>>,
}

impl<S: AccountStore> Bank<S> {
    /// A bank with the system and token programs registered.
    pub fn new(store: S, clock: Arc<dyn Clock>, rent: Rent) -> Self {
        let mut bank = Self {
            store,
            clock,
            rent,
            locks: AccountLocks::new(),
            programs: HashMap::new(),
        };
        bank.register_program(SYSTEM_PROGRAM_ID, Arc::new(SystemProgram));
        bank.register_program(TOKEN_PROGRAM_ID, Arc::new(TokenProgram));
        bank
    }

    pub fn register_program(&mut self, program_id: Address, program: Arc<dyn Program>) {
        self.programs.insert(program_id, program);
    }

    pub fn with_program(mut self, program_id: Address, program: Arc<dyn Program>) -> Self {
        self.register_program(program_id, program);
        self
    }

    pub fn rent(&self) -> Rent {
        self.rent
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn get_account(&self, address: &Address) -> Result<Option<Account>, TransactionError> {
        Ok(self.store.get_account(address)?)
    }

    /// Native balance; zero for an account that does not exist.
    pub fn balance(&self, address: &Address) -> Result<u64, TransactionError> {
        Ok(self.get_account(address)?.map_or(0, |a| a.lamports))
    }

    pub fn accounts_owned_by(&self, owner: &Address) -> Result<Vec<(Address, Account)>, TransactionError> {
        Ok(self.store.iter_accounts_by_owner(owner)?)
    }

    /// Credit lamports out of thin air. Test networks and local tooling only.
    pub fn airdrop(&self, to: &Address, lamports: u64) -> Result<(), TransactionError> {
        let _guard = self.locks.lock(&[*to]);
        let mut account = self.store.get_account(to)?.unwrap_or_default();
        account.lamports = account
            .lamports
            .checked_add(lamports)
            .ok_or(TransactionError::BalanceOverflow(*to))?;
        self.store.commit(&vec![(*to, Some(account))])?;
        info!(address = %to, lamports, "airdrop");
        Ok(())
    }

    /// Verify, lock, execute and commit one transaction.
    ///
    /// Either every instruction succeeds and all staged writes are committed
    /// together, or the transaction is rejected and the store is unchanged.
    pub fn process_transaction(&self, tx: &Transaction) -> Result<(), TransactionError> {
        if tx.message.instructions.is_empty() {
            return Err(TransactionError::Empty);
        }
        let signers = tx.verify()?;

        let mut programs = Vec::with_capacity(tx.message.instructions.len());
        for ix in &tx.message.instructions {
            let program = self
                .programs
                .get(&ix.program_id)
                .ok_or(TransactionError::ProgramNotFound(ix.program_id))?;
            programs.push(Arc::clone(program));
        }

        let keys = tx.message.account_keys();
        let _guard = self.locks.lock(&keys);

        let loaded = keys
            .iter()
            .map(|key| -> Result<(Address, Option<Account>), StoreError> {
                Ok((*key, self.store.get_account(key)?))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let writable: Vec<Address> = keys
            .iter()
            .filter(|key| tx.message.is_writable(key))
            .copied()
            .collect();
        let mut ctx =
            InvocationContext::new(loaded, signers, writable, self.rent, self.clock.as_ref());

        for (index, (ix, program)) in tx.message.instructions.iter().zip(&programs).enumerate() {
            ctx.set_program_id(ix.program_id);
            if let Err(error) = program.process(&mut ctx, &ix.accounts, &ix.data) {
                warn!(index, program = %ix.program_id, %error, "transaction rejected");
                return Err(TransactionError::InstructionError { index, error });
            }
            debug!(index, program = %ix.program_id, "instruction executed");
        }

        let writes = ctx.write_set();
        self.store.commit(&writes)?;
        info!(
            instructions = tx.message.instructions.len(),
            writes = writes.len(),
            "transaction committed"
        );
        Ok(())
    }
}
