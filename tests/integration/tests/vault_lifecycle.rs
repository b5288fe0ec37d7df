//! Integration test: config-driven vault setup, accounting observers, and
//! ledger invariants over a sequence of fills.

use std::sync::Arc;

use tradevault_core::config::{AssetConfig, LoggingConfig};
use tradevault_core::{FixedClock, VaultConfig};
use tradevault_integration_tests::{asset, init_tracing, Market, EXCHANGE, NOW, ONE, VAULT};
use tradevault_settlement::{SettleError, SharedJournal, Vault, ZeroExV2Order};

fn temp_config_path(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "tradevault-it-{}-{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir.join("vault.toml")
}

#[test]
fn test_vault_from_saved_config() {
    init_tracing(&LoggingConfig {
        level: "debug".into(),
        format: "json".into(),
    });
    let market = Market::new();
    let path = temp_config_path("config");

    let mut config = VaultConfig::default();
    config.vault.name = "growth-fund".into();
    config.vault.address = VAULT;
    config.assets = vec![
        AssetConfig {
            id: asset("WETH"),
            initial_balance: 10 * ONE,
        },
        AssetConfig {
            id: asset("MLN"),
            initial_balance: 0,
        },
    ];
    config.save(&path).unwrap();

    let loaded = VaultConfig::load(&path).unwrap();
    let mut vault = Vault::from_config(
        &loaded,
        market.registry.clone(),
        Arc::new(FixedClock(NOW)),
    )
    .unwrap();

    assert_eq!(vault.address(), &VAULT);
    assert_eq!(vault.balance_of(&asset("WETH")).unwrap(), 10 * ONE);

    let order = market.sign(
        ZeroExV2Order::new(market.mln_for_weth(ONE, ONE / 20, None)),
        &EXCHANGE,
    );
    vault.settle(&order, ONE / 20, &EXCHANGE).unwrap();
    assert_eq!(vault.balance_of(&asset("MLN")).unwrap(), ONE);

    if let Some(dir) = path.parent() {
        let _ = std::fs::remove_dir_all(dir);
    }
}

#[test]
fn test_journal_tracks_net_flows() {
    let market = Market::new();
    let mut vault = market.vault(&[("WETH", ONE), ("MLN", 0), ("ZRX", ONE)]);
    let journal = SharedJournal::new();
    vault.register_observer(Box::new(journal.clone()));

    let order = market.sign(
        ZeroExV2Order::new(market.mln_for_weth(ONE, ONE / 20, Some(ONE / 10_000))),
        &EXCHANGE,
    );
    vault.settle(&order, ONE / 40, &EXCHANGE).unwrap();
    vault.settle(&order, ONE / 40, &EXCHANGE).unwrap();
    assert!(vault.settle(&order, 1, &EXCHANGE).is_err());

    let journal = journal.lock();
    assert_eq!(journal.len(), 2);
    assert_eq!(journal.net_flow(&asset("MLN")), ONE as i128);
    assert_eq!(journal.net_flow(&asset("WETH")), -((ONE / 20) as i128));
    assert_eq!(journal.net_flow(&asset("ZRX")), -((ONE / 10_000) as i128));

    let json: serde_json::Value = serde_json::from_str(&journal.to_json().unwrap()).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[test]
fn test_balances_match_journal_after_mixed_outcomes() {
    let market = Market::new();
    let opening = [("WETH", ONE / 10), ("MLN", 0), ("ZRX", ONE / 10_000)];
    let mut vault = market.vault(&opening);
    let journal = SharedJournal::new();
    vault.register_observer(Box::new(journal.clone()));

    let small = market.sign(
        ZeroExV2Order::new(market.mln_for_weth(ONE, ONE / 20, Some(ONE / 20_000))),
        &EXCHANGE,
    );
    let large = market.sign(
        ZeroExV2Order::new(market.mln_for_weth(3 * ONE, ONE / 5, None)),
        &EXCHANGE,
    );

    // full, exhausted, insufficient, partial, zero
    let attempts: [(&tradevault_settlement::AdapterOrder, u128); 5] = [
        (&small, ONE / 20),
        (&small, 1),
        (&large, ONE / 5),
        (&large, ONE / 40),
        (&large, 0),
    ];
    for (order, quantity) in attempts {
        let before = vault.balances();
        match vault.settle(order, quantity, &EXCHANGE) {
            Ok(_) => {}
            Err(SettleError::Verification(e)) => panic!("unexpected verification error: {e}"),
            Err(_) => assert_eq!(vault.balances(), before),
        }
    }

    let journal = journal.lock();
    for (id, opening_balance) in opening {
        let expected = opening_balance as i128 + journal.net_flow(&asset(id));
        assert_eq!(vault.balance_of(&asset(id)).unwrap() as i128, expected, "{id}");
    }
}
