//! Mint and token-account layouts.
//!
//! Both are bincode encoded with fixed-width integers, so every encoding of a
//! given type has the same length. All-zero data decodes as the uninitialized
//! state.

use serde::{Deserialize, Serialize};
use tipy_types::Address;

use crate::TokenError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountState {
    #[default]
    Uninitialized,
    Initialized,
    Frozen,
}

/// A token type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mint {
    /// The only address allowed to issue new supply.
    pub mint_authority: Address,
    pub supply: u64,
    pub decimals: u8,
    pub is_initialized: bool,
}

/// One owner's balance of one mint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAccount {
    pub mint: Address,
    pub owner: Address,
    pub amount: u64,
    pub state: AccountState,
}

impl Mint {
    pub const LEN: usize = 32 + 8 + 1 + 1;

    /// Decode without checking initialization.
    pub fn unpack_unchecked(data: &[u8]) -> Result<Self, TokenError> {
        unpack_exact(data, Self::LEN)
    }

    /// Decode an initialized mint.
    pub fn unpack(data: &[u8]) -> Result<Self, TokenError> {
        let mint = Self::unpack_unchecked(data)?;
        if !mint.is_initialized {
            return Err(TokenError::UninitializedState);
        }
        Ok(mint)
    }

    pub fn pack_into(&self, data: &mut [u8]) -> Result<(), TokenError> {
        pack_exact(self, data, Self::LEN)
    }
}

impl TokenAccount {
    pub const LEN: usize = 32 + 32 + 8 + 4;

    pub fn unpack_unchecked(data: &[u8]) -> Result<Self, TokenError> {
        unpack_exact(data, Self::LEN)
    }

    /// Decode an initialized (possibly frozen) token account.
    pub fn unpack(data: &[u8]) -> Result<Self, TokenError> {
        let account = Self::unpack_unchecked(data)?;
        if !account.is_initialized() {
            return Err(TokenError::UninitializedState);
        }
        Ok(account)
    }

    pub fn pack_into(&self, data: &mut [u8]) -> Result<(), TokenError> {
        pack_exact(self, data, Self::LEN)
    }

    pub fn is_initialized(&self) -> bool {
        self.state != AccountState::Uninitialized
    }

    pub fn is_frozen(&self) -> bool {
        self.state == AccountState::Frozen
    }
}

fn unpack_exact<T: for<'de> Deserialize<'de>>(data: &[u8], len: usize) -> Result<T, TokenError> {
    if data.len() != len {
        return Err(TokenError::InvalidAccountData(format!(
            "expected {len} bytes, got {}",
            data.len()
        )));
    }
    bincode::deserialize(data).map_err(|e| TokenError::InvalidAccountData(e.to_string()))
}

fn pack_exact<T: Serialize>(value: &T, data: &mut [u8], len: usize) -> Result<(), TokenError> {
    if data.len() != len {
        return Err(TokenError::InvalidAccountData(format!(
            "expected {len} bytes, got {}",
            data.len()
        )));
    }
    bincode::serialize_into(data, value).map_err(|e| TokenError::InvalidAccountData(e.to_string()))
}
