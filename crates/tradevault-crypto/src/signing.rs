use ed25519_dalek::Signer;

use crate::error::CryptoError;
use crate::keys::{KeyPair, PublicKey};

/// Detached Ed25519 signature over an order's signing payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    inner: ed25519_dalek::Signature,
}

impl Signature {
    pub fn to_bytes(&self) -> [u8; 64] {
        self.inner.to_bytes()
    }

    /// Parse the raw bytes carried on an order. Anything but 64 bytes is rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let raw: [u8; 64] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidInput(format!("signature must be 64 bytes, got {}", bytes.len()))
        })?;
        Ok(Self {
            inner: ed25519_dalek::Signature::from_bytes(&raw),
        })
    }
}

pub fn sign(message: &[u8], keypair: &KeyPair) -> Signature {
    Signature {
        inner: keypair.signing_key().sign(message),
    }
}

/// Sign a signing payload and return the raw bytes stored on the order.
pub fn sign_payload(payload: &[u8], keypair: &KeyPair) -> Vec<u8> {
    sign(payload, keypair).to_bytes().to_vec()
}

/// Strict verification: rejects non-canonical and small-order encodings.
pub fn verify(message: &[u8], signature: &Signature, pubkey: &PublicKey) -> Result<(), CryptoError> {
    pubkey
        .verifying_key()
        .verify_strict(message, &signature.inner)
        .map_err(|_| CryptoError::SignatureVerificationFailed)
}
