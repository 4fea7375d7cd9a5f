//! Token rules: initialization, issuance, transfer.
//!
//! Every function validates fully before mutating anything, so a returned
//! error leaves its arguments untouched.

use tipy_types::Address;

use crate::state::{AccountState, Mint, TokenAccount};
use crate::TokenError;

/// Initialize zeroed mint data.
pub fn initialize_mint(
    data: &mut [u8],
    mint_authority: Address,
    decimals: u8,
) -> Result<Mint, TokenError> {
    let existing = Mint::unpack_unchecked(data)?;
    if existing.is_initialized {
        return Err(TokenError::AlreadyInUse);
    }
    let mint = Mint {
        mint_authority,
        supply: 0,
        decimals,
        is_initialized: true,
    };
    mint.pack_into(data)?;
    Ok(mint)
}

/// Initialize zeroed token-account data for `owner` under an initialized mint.
pub fn initialize_account(
    data: &mut [u8],
    mint_address: &Address,
    mint_data: &[u8],
    owner: Address,
) -> Result<TokenAccount, TokenError> {
    let existing = TokenAccount::unpack_unchecked(data)?;
    if existing.is_initialized() {
        return Err(TokenError::AlreadyInUse);
    }
    Mint::unpack(mint_data)?;
    let account = TokenAccount {
        mint: *mint_address,
        owner,
        amount: 0,
        state: AccountState::Initialized,
    };
    account.pack_into(data)?;
    Ok(account)
}

/// Issue `amount` new tokens into `destination`.
pub fn mint_to(
    mint: &mut Mint,
    mint_address: &Address,
    destination: &mut TokenAccount,
    authority: &Address,
    amount: u64,
) -> Result<(), TokenError> {
    if !mint.is_initialized || !destination.is_initialized() {
        return Err(TokenError::UninitializedState);
    }
    if destination.is_frozen() {
        return Err(TokenError::AccountFrozen);
    }
    if destination.mint != *mint_address {
        return Err(TokenError::MintMismatch);
    }
    if mint.mint_authority != *authority {
        return Err(TokenError::OwnerMismatch);
    }
    let supply = mint.supply.checked_add(amount).ok_or(TokenError::Overflow)?;
    let balance = destination
        .amount
        .checked_add(amount)
        .ok_or(TokenError::Overflow)?;
    mint.supply = supply;
    destination.amount = balance;
    Ok(())
}

/// Every check [`transfer`] performs, without moving anything.
///
/// Used directly when source and destination are the same account.
pub fn check_transfer(
    source: &TokenAccount,
    destination: &TokenAccount,
    mint: &Address,
    authority: &Address,
    amount: u64,
) -> Result<(), TokenError> {
    if !source.is_initialized() || !destination.is_initialized() {
        return Err(TokenError::UninitializedState);
    }
    if source.is_frozen() || destination.is_frozen() {
        return Err(TokenError::AccountFrozen);
    }
    if source.mint != *mint || destination.mint != *mint {
        return Err(TokenError::MintMismatch);
    }
    if source.owner != *authority {
        return Err(TokenError::OwnerMismatch);
    }
    if source.amount < amount {
        return Err(TokenError::InsufficientFunds {
            needed: amount,
            available: source.amount,
        });
    }
    Ok(())
}

/// Move `amount` from `source` to `destination`, authorized by the source owner.
pub fn transfer(
    source: &mut TokenAccount,
    destination: &mut TokenAccount,
    mint: &Address,
    authority: &Address,
    amount: u64,
) -> Result<(), TokenError> {
    check_transfer(source, destination, mint, authority, amount)?;
    let credited = destination
        .amount
        .checked_add(amount)
        .ok_or(TokenError::Overflow)?;
    source.amount -= amount;
    destination.amount = credited;
    Ok(())
}
