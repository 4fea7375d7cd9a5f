//! Account record and storage trait.

use serde::{Deserialize, Serialize};
use tipy_types::{Address, SYSTEM_PROGRAM_ID};

use crate::StoreError;

/// A stored account: a native balance, the program that owns it, and
/// program-defined data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub lamports: u64,
    pub owner: Address,
    pub data: Vec<u8>,
}

impl Account {
    /// A data-less account owned by the system program.
    pub fn new_wallet(lamports: u64) -> Self {
        Self {
            lamports,
            owner: SYSTEM_PROGRAM_ID,
            data: Vec::new(),
        }
    }

    /// No lamports and no data. Empty accounts are not persisted.
    pub fn is_empty(&self) -> bool {
        self.lamports == 0 && self.data.is_empty()
    }
}

impl Default for Account {
    /// A missing account reads as an empty wallet.
    fn default() -> Self {
        Self::new_wallet(0)
    }
}

/// Pending writes: `Some` stores the account, `None` deletes it.
pub type WriteSet = Vec<(Address, Option<Account>)>;

/// Trait for account storage operations.
pub trait AccountStore: Send + Sync {
    fn get_account(&self, address: &Address) -> Result<Option<Account>, StoreError>;

    fn exists(&self, address: &Address) -> Result<bool, StoreError> {
        self.get_account(address).map(|a| a.is_some())
    }

    fn account_count(&self) -> Result<u64, StoreError>;

    /// Every stored account, in address order.
    fn iter_accounts(&self) -> Result<Vec<(Address, Account)>, StoreError>;

    /// Accounts owned by `owner`, in address order.
    fn iter_accounts_by_owner(&self, owner: &Address) -> Result<Vec<(Address, Account)>, StoreError> {
        Ok(self
            .iter_accounts()?
            .into_iter()
            .filter(|(_, account)| account.owner == *owner)
            .collect())
    }

    /// Apply every write in `writes` or none of them.
    fn commit(&self, writes: &WriteSet) -> Result<(), StoreError>;
}
