//! Cryptographic primitives for tipy.
//!
//! - **Ed25519** for transaction signing and signature verification
//! - **Blake2b** for hashing
//! - Program-derived addresses: deterministic account addresses computed from
//!   seeds and an owning program, with no private key

pub mod derive;
pub mod error;
pub mod hash;
pub mod keys;
pub mod sign;

pub use derive::{derive_program_address, MAX_SEEDS, MAX_SEED_LEN};
pub use error::CryptoError;
pub use hash::{blake2b_256, blake2b_256_multi};
pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed, public_from_private};
pub use sign::{sign_message, verify_signature};
