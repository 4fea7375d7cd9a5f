//! Program-derived addresses.
//!
//! `address = Blake2b-256(seed_0 || .. || seed_n || program_id || MARKER)`
//!
//! Seeds are hashed in the order given. Callers that mix variable-length seeds
//! must keep their layout unambiguous; fixed-size seeds such as addresses
//! concatenate safely.

use tipy_types::Address;

use crate::{blake2b_256_multi, CryptoError};

pub const MAX_SEEDS: usize = 16;
pub const MAX_SEED_LEN: usize = 32;

const MARKER: &[u8] = b"ProgramDerivedAddress";

/// Derive the address owned by `program_id` for the given seeds.
pub fn derive_program_address(seeds: &[&[u8]], program_id: &Address) -> Result<Address, CryptoError> {
    if seeds.len() > MAX_SEEDS {
        return Err(CryptoError::TooManySeeds {
            count: seeds.len(),
            max: MAX_SEEDS,
        });
    }
    if let Some((index, seed)) = seeds.iter().enumerate().find(|(_, s)| s.len() > MAX_SEED_LEN) {
        return Err(CryptoError::SeedTooLong {
            index,
            len: seed.len(),
            max: MAX_SEED_LEN,
        });
    }

    let mut parts: Vec<&[u8]> = Vec::with_capacity(seeds.len() + 2);
    parts.extend_from_slice(seeds);
    parts.push(program_id.as_ref());
    parts.push(MARKER);
    Ok(Address::new(blake2b_256_multi(&parts)))
}
