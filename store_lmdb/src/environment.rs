//! LMDB environment and the account database.

use std::path::Path;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use tipy_store::{Account, AccountStore, StoreError, WriteSet};
use tipy_types::Address;

use crate::LmdbError;

/// The schema version that the current code writes.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";

/// Wraps the LMDB environment and its database handles.
pub struct LmdbEnvironment {
    env: Env,
    accounts_db: Database<Bytes, Bytes>,
    meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at `path`.
    ///
    /// Refuses to open a database written with a newer schema.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;
        // SAFETY: the environment is opened once per process for this path and
        // the memory map is never accessed outside heed's transactions.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(2)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let accounts_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some("accounts"))?;
        let meta_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some("meta"))?;

        let stored = match meta_db.get(&wtxn, SCHEMA_VERSION_KEY)? {
            Some(bytes) => {
                let arr: [u8; 4] = bytes.try_into().map_err(|_| {
                    LmdbError::Serialization("schema_version has unexpected byte length".into())
                })?;
                u32::from_le_bytes(arr)
            }
            None => 0,
        };
        if stored > CURRENT_SCHEMA_VERSION {
            return Err(LmdbError::UnsupportedSchema {
                found: stored,
                supported: CURRENT_SCHEMA_VERSION,
            });
        }
        if stored < CURRENT_SCHEMA_VERSION {
            meta_db.put(
                &mut wtxn,
                SCHEMA_VERSION_KEY,
                &CURRENT_SCHEMA_VERSION.to_le_bytes(),
            )?;
            tracing::info!(from = stored, to = CURRENT_SCHEMA_VERSION, "initialised account schema");
        }
        wtxn.commit()?;

        Ok(Self {
            env,
            accounts_db,
            meta_db,
        })
    }

    pub fn schema_version(&self) -> Result<u32, LmdbError> {
        let rtxn = self.env.read_txn()?;
        let val = self.meta_db.get(&rtxn, SCHEMA_VERSION_KEY)?;
        match val {
            Some(bytes) => {
                let arr: [u8; 4] = bytes.try_into().map_err(|_| {
                    LmdbError::Serialization("schema_version has unexpected byte length".into())
                })?;
                Ok(u32::from_le_bytes(arr))
            }
            None => Ok(0),
        }
    }
}

fn decode_entry(key: &[u8], val: &[u8]) -> Result<(Address, Account), LmdbError> {
    let address = Address::from_slice(key)
        .map_err(|e| LmdbError::Serialization(format!("account key: {e}")))?;
    let account: Account = bincode::deserialize(val)?;
    Ok((address, account))
}

impl AccountStore for LmdbEnvironment {
    fn get_account(&self, address: &Address) -> Result<Option<Account>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .accounts_db
            .get(&rtxn, address.as_bytes())
            .map_err(LmdbError::from)?;
        match val {
            Some(bytes) => {
                let account: Account = bincode::deserialize(bytes).map_err(LmdbError::from)?;
                Ok(Some(account))
            }
            None => Ok(None),
        }
    }

    fn account_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let count = self.accounts_db.len(&rtxn).map_err(LmdbError::from)?;
        Ok(count)
    }

    fn iter_accounts(&self) -> Result<Vec<(Address, Account)>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut accounts = Vec::new();
        let iter = self.accounts_db.iter(&rtxn).map_err(LmdbError::from)?;
        for result in iter {
            let (key, val) = result.map_err(LmdbError::from)?;
            accounts.push(decode_entry(key, val)?);
        }
        Ok(accounts)
    }

    /// One LMDB write transaction per commit. Dropping it on error aborts
    /// every write already staged in it.
    fn commit(&self, writes: &WriteSet) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        for (address, account) in writes {
            match account {
                Some(account) => {
                    let bytes = bincode::serialize(account).map_err(LmdbError::from)?;
                    self.accounts_db
                        .put(&mut wtxn, address.as_bytes(), &bytes)
                        .map_err(LmdbError::from)?;
                }
                None => {
                    self.accounts_db
                        .delete(&mut wtxn, address.as_bytes())
                        .map_err(LmdbError::from)?;
                }
            }
        }
        wtxn.commit().map_err(LmdbError::from)?;
        tracing::trace!(writes = writes.len(), "committed account writes");
        Ok(())
    }
}
