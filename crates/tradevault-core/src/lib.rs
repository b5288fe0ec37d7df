//! Tradevault Core: fundamental types, the signed order model, and
//! configuration shared by the crypto and settlement crates.

pub mod config;
pub mod error;
pub mod order;
pub mod order_state;
pub mod traits;
pub mod types;
pub mod wire;

pub use config::VaultConfig;
pub use error::CoreError;
pub use order::{Order, OrderBuilder, OrderFee, SigningDomain, ORDER_ENCODING_VERSION};
pub use order_state::{OrderEvent, OrderState, OrderStateMachine};
pub use traits::{Clock, FixedClock, SignatureVerifier, SystemClock};
pub use types::{Address, AssetId, OrderHash, Quantity};
