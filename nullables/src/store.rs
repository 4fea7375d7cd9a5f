//! Nullable store — thread-safe in-memory account storage for testing.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tipy_store::{Account, AccountStore, StoreError, WriteSet};
use tipy_types::Address;

/// An in-memory account store.
///
/// Commits apply under a single lock, so readers never observe half a write
/// set. [`NullStore::fail_commits`] makes every commit fail without writing.
pub struct NullStore {
    accounts: Mutex<BTreeMap<Address, Account>>,
    fail_commits: AtomicBool,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(BTreeMap::new()),
            fail_commits: AtomicBool::new(false),
        }
    }

    /// Seed the store with accounts, bypassing any runtime.
    pub fn with_accounts(accounts: impl IntoIterator<Item = (Address, Account)>) -> Self {
        let store = Self::new();
        store.accounts.lock().unwrap().extend(accounts);
        store
    }

    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountStore for NullStore {
    fn get_account(&self, address: &Address) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.lock().unwrap().get(address).cloned())
    }

    fn account_count(&self) -> Result<u64, StoreError> {
        Ok(self.accounts.lock().unwrap().len() as u64)
    }

    fn iter_accounts(&self) -> Result<Vec<(Address, Account)>, StoreError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .map(|(address, account)| (*address, account.clone()))
            .collect())
    }

    fn commit(&self, writes: &WriteSet) -> Result<(), StoreError> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("null store commits disabled".into()));
        }
        let mut accounts = self.accounts.lock().unwrap();
        for (address, account) in writes {
            match account {
                Some(account) => {
                    accounts.insert(*address, account.clone());
                }
                None => {
                    accounts.remove(address);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_applies_puts_and_deletes() {
        let a = Address::new([1u8; 32]);
        let b = Address::new([2u8; 32]);
        let store = NullStore::with_accounts([(a, Account::new_wallet(3))]);
        store
            .commit(&vec![(a, None), (b, Some(Account::new_wallet(4)))])
            .unwrap();
        assert!(!store.exists(&a).unwrap());
        assert_eq!(store.get_account(&b).unwrap().unwrap().lamports, 4);
    }

    #[test]
    fn failed_commit_writes_nothing() {
        let a = Address::new([1u8; 32]);
        let store = NullStore::new();
        store.fail_commits(true);
        assert!(store.commit(&vec![(a, Some(Account::new_wallet(1)))]).is_err());
        assert_eq!(store.account_count().unwrap(), 0);
    }
}
