//! Key material used to authorize transactions.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::Address;

/// A 32-byte Ed25519 private key seed.
///
/// Does not implement `Debug` or `Clone`. Key bytes are zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(pub [u8; 32]);

/// A 64-byte Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

impl Signature {
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head: String = self.0[..4].iter().map(|b| format!("{b:02x}")).collect();
        write!(f, "Signature({head}..)")
    }
}

/// An Ed25519 key pair. The public half doubles as the wallet address.
///
/// Built with `tipy_crypto::generate_keypair()` or `tipy_crypto::keypair_from_seed()`.
pub struct KeyPair {
    pub public: Address,
    pub private: PrivateKey,
}

impl KeyPair {
    pub fn address(&self) -> Address {
        self.public
    }
}
