//! Well-known program identifiers.

use crate::Address;

/// Pads a short ASCII name into a 32-byte identifier.
const fn padded(name: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut i = 0;
    while i < name.len() && i < 32 {
        out[i] = name[i];
        i += 1;
    }
    out
}

/// Owner of every wallet account; performs native transfers and allocation.
pub const SYSTEM_PROGRAM_ID: Address = Address::new(padded(b"tipy_system_program"));

/// The fungible-token subsystem.
pub const TOKEN_PROGRAM_ID: Address = Address::new(padded(b"tipy_token_program"));

/// The tip program that records ledger entries.
pub const TIPY_PROGRAM_ID: Address = Address::new(padded(b"tipy_tip_program"));

/// Mint sentinel selecting a native-currency transfer.
pub const NATIVE_MINT: Address = Address::DEFAULT;
