//! Fixtures shared by the cross-crate settlement scenarios.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use tradevault_core::config::LoggingConfig;
use tradevault_core::{Address, AssetId, FixedClock, Order, Quantity};
use tradevault_crypto::{sign_payload, KeyPair, KeyRegistry};
use tradevault_settlement::{AdapterOrder, Vault};

/// 1.0 of an 18-decimal token.
pub const ONE: Quantity = 1_000_000_000_000_000_000;

/// Exchange every scenario settles against.
pub const EXCHANGE: Address = Address::from_bytes([0xe7; 20]);

/// Vault identity used by the fixtures.
pub const VAULT: Address = Address::from_bytes([0x7a; 20]);

/// Fee recipient named in fee-bearing orders.
pub const FEE_RECIPIENT: Address = Address::from_bytes([0xfe; 20]);

/// Fixed "now" for every scenario.
pub const NOW: u64 = 1_700_000_000;

/// Install a test-writer subscriber configured from `logging`.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_test_writer();
    let _ = if logging.format == "json" {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

pub fn asset(id: &str) -> AssetId {
    AssetId::new(id).expect("fixture asset ids are non-empty")
}

/// A counterparty whose key is registered with the vault's identity source.
pub struct Market {
    pub registry: Arc<KeyRegistry>,
    pub maker: KeyPair,
}

impl Market {
    pub fn new() -> Self {
        init_tracing(&LoggingConfig::default());
        let maker = KeyPair::from_seed(&[0x4d; 32]);
        let registry = Arc::new(KeyRegistry::new());
        registry.register(maker.public_key());
        Self { registry, maker }
    }

    /// Vault at [`VAULT`] holding the given opening balances.
    pub fn vault(&self, balances: &[(&str, Quantity)]) -> Vault {
        let mut vault = Vault::new(VAULT, self.registry.clone(), Arc::new(FixedClock(NOW)));
        for (id, quantity) in balances {
            vault.onboard_asset(asset(id));
            if *quantity > 0 {
                vault
                    .deposit(&asset(id), *quantity)
                    .expect("fixture deposit succeeds");
            }
        }
        vault
    }

    /// Order selling `maker_qty` MLN for `taker_qty` WETH, optionally with a ZRX fee.
    pub fn mln_for_weth(&self, maker_qty: Quantity, taker_qty: Quantity, fee: Option<Quantity>) -> Order {
        let mut builder = Order::builder()
            .maker(self.maker.address())
            .maker_side(asset("MLN"), maker_qty)
            .taker_side(asset("WETH"), taker_qty)
            .expiry(NOW + 86_400)
            .salt(0x5eed);
        if let Some(q) = fee {
            builder = builder.fee(asset("ZRX"), q, FEE_RECIPIENT);
        }
        builder.build().expect("fixture order is valid")
    }

    /// Sign `order` for settlement against `target`.
    pub fn sign(&self, order: impl Into<AdapterOrder>, target: &Address) -> AdapterOrder {
        let order = order.into();
        let signature = sign_payload(&order.signing_payload(target), &self.maker);
        order.with_signature(signature)
    }
}

impl Default for Market {
    fn default() -> Self {
        Self::new()
    }
}
