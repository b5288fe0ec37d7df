use crate::types::Address;

/// Capability that checks a maker's signature over an encoded message.
///
/// Implementations resolve `claimed_signer` to key material through whatever
/// identity source the deployment uses, so no curve is baked into the core.
pub trait SignatureVerifier: Send + Sync {
    /// Whether `signature` is a valid signature over `message` by `claimed_signer`.
    fn verify_signature(&self, message: &[u8], signature: &[u8], claimed_signer: &Address) -> bool;
}

/// Source of the current time, in unix seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// Wall-clock time from the system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        chrono::Utc::now().timestamp().max(0) as u64
    }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.0
    }
}
