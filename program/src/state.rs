//! The ledger entry and where it lives.

use serde::{Deserialize, Serialize};
use tipy_crypto::{derive_program_address, CryptoError};
use tipy_types::{Address, TIPY_PROGRAM_ID};

use crate::EntryError;

/// Domain tag of the ledger-entry address derivation.
pub const ENTRY_SEED: &[u8] = b"tip_transaction";

/// Longest accepted message, in bytes.
pub const MAX_MESSAGE_LEN: usize = 100;

/// Immutable receipt of one accepted tip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub sender: Address,
    pub receiver: Address,
    pub amount: u64,
    pub message: String,
    /// Seconds since the Unix epoch, from the host clock at execution.
    pub timestamp: i64,
    pub is_native: bool,
}

impl LedgerEntry {
    pub const DISCRIMINATOR: [u8; 8] = *b"tip_rcpt";

    /// Discriminator, two addresses, amount, length-prefixed message at its
    /// maximum, timestamp, flag.
    pub const SPACE: usize = 8 + 32 + 32 + 8 + (8 + MAX_MESSAGE_LEN) + 8 + 1;

    /// Write discriminator and fields into freshly allocated slot data.
    pub fn write_to(&self, data: &mut [u8]) -> Result<(), EntryError> {
        let body = bincode::serialize(self).map_err(|e| EntryError::Malformed(e.to_string()))?;
        let needed = Self::DISCRIMINATOR.len() + body.len();
        if needed > data.len() {
            return Err(EntryError::DoesNotFit {
                needed,
                available: data.len(),
            });
        }
        let (head, tail) = data.split_at_mut(Self::DISCRIMINATOR.len());
        head.copy_from_slice(&Self::DISCRIMINATOR);
        tail[..body.len()].copy_from_slice(&body);
        Ok(())
    }

    pub fn decode(data: &[u8]) -> Result<Self, EntryError> {
        let body = data
            .strip_prefix(&Self::DISCRIMINATOR[..])
            .ok_or(EntryError::WrongDiscriminator)?;
        bincode::deserialize(body).map_err(|e| EntryError::Malformed(e.to_string()))
    }

    /// Whether account data starts with the ledger-entry discriminator.
    pub fn is_entry(data: &[u8]) -> bool {
        data.starts_with(&Self::DISCRIMINATOR)
    }
}

pub fn entry_seeds<'a>(sender: &'a Address, receiver: &'a Address) -> [&'a [u8]; 3] {
    [ENTRY_SEED, sender.as_bytes(), receiver.as_bytes()]
}

/// The one slot a (sender, receiver) pair's entry can occupy.
pub fn entry_address(sender: &Address, receiver: &Address) -> Result<Address, CryptoError> {
    derive_program_address(&entry_seeds(sender, receiver), &TIPY_PROGRAM_ID)
}
