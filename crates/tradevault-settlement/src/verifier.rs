use std::sync::Arc;

use tradevault_core::{Address, Clock, SignatureVerifier};

use crate::adapters::AdapterOrder;
use crate::error::VerificationError;

/// Checks that an order is well formed, unexpired, and signed by its maker.
///
/// Verification is pure: it reads the clock once and consults the identity
/// source, but never mutates anything, so it can be repeated freely.
#[derive(Clone)]
pub struct OrderVerifier {
    signatures: Arc<dyn SignatureVerifier>,
    clock: Arc<dyn Clock>,
}

impl OrderVerifier {
    pub fn new(signatures: Arc<dyn SignatureVerifier>, clock: Arc<dyn Clock>) -> Self {
        Self { signatures, clock }
    }

    /// Current time as seen by this verifier.
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    /// Check `order` as bound to `target`.
    ///
    /// Structural problems are reported first, then expiry, then the signature.
    pub fn verify(&self, order: &AdapterOrder, target: &Address) -> Result<(), VerificationError> {
        order.validate()?;

        let now = self.now();
        let terms = order.order();
        if terms.is_expired_at(now) {
            return Err(VerificationError::Expired {
                expiry: terms.expiry,
                now,
            });
        }

        let payload = order.signing_payload(target);
        if !self
            .signatures
            .verify_signature(&payload, &terms.signature, &terms.maker)
        {
            return Err(VerificationError::InvalidSignature { maker: terms.maker });
        }
        Ok(())
    }
}

impl std::fmt::Debug for OrderVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderVerifier").finish_non_exhaustive()
    }
}
