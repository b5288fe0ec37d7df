use dashmap::DashMap;
use tradevault_core::{Address, SignatureVerifier};

use crate::keys::PublicKey;
use crate::signing::{verify, Signature};

/// Identity source mapping maker addresses to Ed25519 public keys.
///
/// Implements [`SignatureVerifier`] so a vault can check order signatures
/// against the registered keys.
#[derive(Default)]
pub struct KeyRegistry {
    keys: DashMap<Address, PublicKey>,
}

impl KeyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key under its derived address and return that address.
    pub fn register(&self, public_key: PublicKey) -> Address {
        let address = public_key.address();
        self.register_for(address, public_key);
        address
    }

    /// Register a key under an externally assigned address.
    pub fn register_for(&self, address: Address, public_key: PublicKey) {
        tracing::debug!(%address, key = %public_key.to_hex(), "registering maker key");
        self.keys.insert(address, public_key);
    }

    /// Remove a key. Returns whether one was registered.
    pub fn revoke(&self, address: &Address) -> bool {
        self.keys.remove(address).is_some()
    }

    /// Look up the key registered for an address.
    pub fn resolve(&self, address: &Address) -> Option<PublicKey> {
        self.keys.get(address).map(|k| k.value().clone())
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl SignatureVerifier for KeyRegistry {
    fn verify_signature(&self, message: &[u8], signature: &[u8], claimed_signer: &Address) -> bool {
        let Some(public_key) = self.resolve(claimed_signer) else {
            tracing::debug!(signer = %claimed_signer, "no key registered for signer");
            return false;
        };
        let Ok(signature) = Signature::from_bytes(signature) else {
            tracing::debug!(signer = %claimed_signer, len = signature.len(), "malformed signature bytes");
            return false;
        };
        verify(message, &signature, &public_key).is_ok()
    }
}
