pub mod error;
pub mod hashing;
pub mod keys;
pub mod registry;
pub mod signing;

pub use error::CryptoError;
pub use hashing::{hash, order_hash, Hash};
pub use keys::{KeyPair, PublicKey};
pub use registry::KeyRegistry;
pub use signing::{sign, sign_payload, verify, Signature};
