//! Instructions, messages, and signed transactions.

use serde::{Deserialize, Serialize};
use tipy_crypto::{sign_message, verify_signature};
use tipy_types::{Address, KeyPair, Signature};

use crate::TransactionError;

/// One account referenced by an instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMeta {
    pub address: Address,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn new(address: Address, is_signer: bool) -> Self {
        Self {
            address,
            is_signer,
            is_writable: true,
        }
    }

    pub fn new_readonly(address: Address, is_signer: bool) -> Self {
        Self {
            address,
            is_signer,
            is_writable: false,
        }
    }
}

/// A call into one program with an ordered account list and opaque data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub program_id: Address,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

/// The signed payload: instructions executed in order, all or nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub instructions: Vec<Instruction>,
}

impl Message {
    pub fn to_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        bincode::serialize(self).map_err(|e| TransactionError::Encoding(e.to_string()))
    }

    /// Every distinct account the message references, in first-seen order.
    pub fn account_keys(&self) -> Vec<Address> {
        let mut keys = Vec::new();
        for ix in &self.instructions {
            for meta in &ix.accounts {
                if !keys.contains(&meta.address) {
                    keys.push(meta.address);
                }
            }
        }
        keys
    }

    /// Accounts some instruction marks as signer.
    pub fn required_signers(&self) -> Vec<Address> {
        let mut signers = Vec::new();
        for meta in self.instructions.iter().flat_map(|ix| &ix.accounts) {
            if meta.is_signer && !signers.contains(&meta.address) {
                signers.push(meta.address);
            }
        }
        signers
    }

    pub fn is_writable(&self, address: &Address) -> bool {
        self.instructions
            .iter()
            .flat_map(|ix| &ix.accounts)
            .any(|meta| meta.address == *address && meta.is_writable)
    }
}

/// A message plus signatures over its bincode encoding.
#[derive(Clone, Debug)]
pub struct Transaction {
    pub message: Message,
    pub signatures: Vec<(Address, Signature)>,
}

impl Transaction {
    /// Build and sign a transaction. Every key pair signs the same message bytes.
    pub fn new_signed(
        instructions: Vec<Instruction>,
        signers: &[&KeyPair],
    ) -> Result<Self, TransactionError> {
        let message = Message { instructions };
        let bytes = message.to_bytes()?;
        let signatures = signers
            .iter()
            .map(|kp| (kp.public, sign_message(&bytes, &kp.private)))
            .collect();
        Ok(Self {
            message,
            signatures,
        })
    }

    /// Verify every attached signature and return the verified signer set.
    ///
    /// Fails if any signature is invalid or any account marked as signer has
    /// no signature.
    pub fn verify(&self) -> Result<Vec<Address>, TransactionError> {
        let bytes = self.message.to_bytes()?;
        let mut verified = Vec::with_capacity(self.signatures.len());
        for (signer, signature) in &self.signatures {
            if !verify_signature(&bytes, signature, signer) {
                return Err(TransactionError::InvalidSignature(*signer));
            }
            verified.push(*signer);
        }
        if let Some(missing) = self
            .message
            .required_signers()
            .into_iter()
            .find(|s| !verified.contains(s))
        {
            return Err(TransactionError::MissingSignature(missing));
        }
        Ok(verified)
    }
}
