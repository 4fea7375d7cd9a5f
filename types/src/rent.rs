//! Minimum balances an account must retain to stay allocated.

use serde::{Deserialize, Serialize};

/// Rent schedule: `minimum_balance(len) = (account_overhead + len) * lamports_per_byte`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rent {
    pub lamports_per_byte: u64,
    /// Bytes of bookkeeping charged for every account regardless of data size.
    pub account_overhead: u64,
}

impl Rent {
    pub const DEFAULT_LAMPORTS_PER_BYTE: u64 = 6_960;
    pub const DEFAULT_ACCOUNT_OVERHEAD: u64 = 128;

    /// A schedule that charges nothing.
    pub const fn free() -> Self {
        Self {
            lamports_per_byte: 0,
            account_overhead: 0,
        }
    }

    /// Lamports an account holding `data_len` bytes must keep. Saturates.
    pub fn minimum_balance(&self, data_len: usize) -> u64 {
        let bytes = self.account_overhead.saturating_add(data_len as u64);
        bytes.saturating_mul(self.lamports_per_byte)
    }
}

impl Default for Rent {
    fn default() -> Self {
        Self {
            lamports_per_byte: Self::DEFAULT_LAMPORTS_PER_BYTE,
            account_overhead: Self::DEFAULT_ACCOUNT_OVERHEAD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_empty_account_minimum() {
        assert_eq!(Rent::default().minimum_balance(0), 890_880);
    }

    #[test]
    fn free_schedule_is_zero() {
        assert_eq!(Rent::free().minimum_balance(10_000), 0);
    }
}
