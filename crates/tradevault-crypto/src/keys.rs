use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use tradevault_core::Address;
use zeroize::Zeroize;

use crate::error::CryptoError;
use crate::hashing::hash;

/// A maker's Ed25519 signing key.
///
/// The secret scalar is wiped on drop by ed25519-dalek.
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Fresh key from OS entropy.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Deterministic key from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Load a key from its secret bytes. The temporary copy is zeroized.
    pub fn from_secret_bytes(secret: &[u8]) -> Result<Self, CryptoError> {
        let mut seed: [u8; 32] = secret.try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: 32,
            actual: secret.len(),
        })?;
        let keypair = Self::from_seed(&seed);
        seed.zeroize();
        Ok(keypair)
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            verifying_key: self.signing_key.verifying_key(),
        }
    }

    /// Maker address of this key, see [`PublicKey::address`].
    pub fn address(&self) -> Address {
        self.public_key().address()
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

/// Ed25519 verifying key of a maker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    verifying_key: VerifyingKey,
}

impl PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let raw: [u8; 32] = bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: 32,
            actual: bytes.len(),
        })?;
        let verifying_key = VerifyingKey::from_bytes(&raw)
            .map_err(|e| CryptoError::InvalidInput(format!("not a curve point: {}", e)))?;
        Ok(Self { verifying_key })
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        self.verifying_key.as_bytes()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    /// First 20 bytes of BLAKE3 over the key bytes.
    pub fn address(&self) -> Address {
        let digest = hash(self.as_bytes());
        let mut bytes = [0u8; Address::LEN];
        bytes.copy_from_slice(&digest[..Address::LEN]);
        Address::from_bytes(bytes)
    }

    pub(crate) fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }
}
