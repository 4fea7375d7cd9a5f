//! Per-account locks.
//!
//! A transaction takes every account it names before it runs and holds them
//! until it has committed or been discarded. Transactions on disjoint account
//! sets proceed in parallel; a transaction that overlaps a running one waits.

use std::collections::HashSet;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use tipy_types::Address;

#[derive(Default)]
pub struct AccountLocks {
    locked: Mutex<HashSet<Address>>,
    released: Condvar,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until every key is free, then take all of them at once.
    ///
    /// Taking the whole set atomically means two transactions can never each
    /// hold part of the other's set, so there is no lock-order deadlock.
    pub fn lock(&self, keys: &[Address]) -> LockGuard<'_> {
        let mut locked = self.guard();
        while keys.iter().any(|k| locked.contains(k)) {
            locked = self
                .released
                .wait(locked)
                .unwrap_or_else(PoisonError::into_inner);
        }
        locked.extend(keys.iter().copied());
        LockGuard {
            locks: self,
            keys: keys.to_vec(),
        }
    }

    /// Take every key only if all are free right now.
    pub fn try_lock(&self, keys: &[Address]) -> Option<LockGuard<'_>> {
        let mut locked = self.guard();
        if keys.iter().any(|k| locked.contains(k)) {
            return None;
        }
        locked.extend(keys.iter().copied());
        Some(LockGuard {
            locks: self,
            keys: keys.to_vec(),
        })
    }

    pub fn is_locked(&self, key: &Address) -> bool {
        self.guard().contains(key)
    }

    fn guard(&self) -> MutexGuard<'_, HashSet<Address>> {
        self.locked.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases its keys on drop.
pub struct LockGuard<'a> {
    locks: &'a AccountLocks,
    keys: Vec<Address>,
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        let mut locked = self.locks.guard();
        for key in &self.keys {
            locked.remove(key);
        }
        drop(locked);
        self.locks.released.notify_all();
    }
}
