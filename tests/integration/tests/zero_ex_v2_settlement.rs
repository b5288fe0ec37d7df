//! Integration test: settling 0x v2 orders against a funded vault.
//!
//! Mirrors the take-order flows a fund manager runs: full fills with and
//! without fees, over-fills, partial fills and exhaustion.

use tradevault_core::OrderState;
use tradevault_integration_tests::{asset, Market, EXCHANGE, ONE};
use tradevault_settlement::{FillError, SettleError, TradeJournal, ZeroExV2Order};

const MLN_QTY: u128 = ONE;
const WETH_QTY: u128 = ONE / 20;
const ZRX_FEE: u128 = ONE / 10_000;

// =========================================================================
// Full fills
// =========================================================================

#[test]
fn test_take_order_without_fee() {
    let market = Market::new();
    let mut vault = market.vault(&[("WETH", ONE), ("MLN", 0), ("ZRX", ONE)]);
    let order = market.sign(
        ZeroExV2Order::new(market.mln_for_weth(MLN_QTY, WETH_QTY, None)),
        &EXCHANGE,
    );

    let record = vault.settle(&order, WETH_QTY, &EXCHANGE).expect("fill should settle");

    assert_eq!(vault.balance_of(&asset("MLN")).unwrap(), MLN_QTY);
    assert_eq!(vault.balance_of(&asset("WETH")).unwrap(), ONE - WETH_QTY);
    assert_eq!(vault.balance_of(&asset("ZRX")).unwrap(), ONE);

    assert_eq!(record.target(), &EXCHANGE);
    assert_eq!(record.buy_asset(), &asset("MLN"));
    assert_eq!(record.buy_amount(), MLN_QTY);
    assert_eq!(record.sell_asset(), &asset("WETH"));
    assert_eq!(record.sell_amount(), WETH_QTY);
    assert!(record.fee_assets().is_empty());
    assert!(record.fee_amounts().is_empty());
}

#[test]
fn test_take_order_with_fee() {
    let market = Market::new();
    let mut vault = market.vault(&[("WETH", ONE), ("MLN", 0), ("ZRX", ONE)]);
    let order = market.sign(
        ZeroExV2Order::new(market.mln_for_weth(MLN_QTY, WETH_QTY, Some(ZRX_FEE))),
        &EXCHANGE,
    );

    let record = vault.settle(&order, WETH_QTY, &EXCHANGE).expect("fill should settle");

    assert_eq!(vault.balance_of(&asset("MLN")).unwrap(), MLN_QTY);
    assert_eq!(vault.balance_of(&asset("WETH")).unwrap(), ONE - WETH_QTY);
    assert_eq!(vault.balance_of(&asset("ZRX")).unwrap(), ONE - ZRX_FEE);
    assert_eq!(record.fee_assets(), &[asset("ZRX")]);
    assert_eq!(record.fee_amounts(), &[ZRX_FEE]);
    assert_eq!(vault.order_state(&order, &EXCHANGE), OrderState::FullyFilled);
}

#[test]
fn test_record_json_for_accounting() {
    let market = Market::new();
    let mut vault = market.vault(&[("WETH", ONE), ("MLN", 0), ("ZRX", ONE)]);
    let order = market.sign(
        ZeroExV2Order::new(market.mln_for_weth(MLN_QTY, WETH_QTY, Some(ZRX_FEE))),
        &EXCHANGE,
    );

    let record = vault.settle(&order, WETH_QTY, &EXCHANGE).unwrap();
    let json: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();

    assert_eq!(json["target"], serde_json::json!(EXCHANGE.to_string()));
    assert_eq!(json["buyAsset"], serde_json::json!("MLN"));
    assert_eq!(json["sellAsset"], serde_json::json!("WETH"));
    assert_eq!(json["feeAssets"], serde_json::json!(["ZRX"]));
    assert_eq!(json["feeAmounts"].as_array().unwrap().len(), 1);
}

// =========================================================================
// Rejections
// =========================================================================

#[test]
fn test_overfill_by_one_unit() {
    let market = Market::new();
    let mut vault = market.vault(&[("WETH", ONE), ("MLN", 0)]);
    let order = market.sign(
        ZeroExV2Order::new(market.mln_for_weth(MLN_QTY, WETH_QTY, None)),
        &EXCHANGE,
    );
    let before = vault.balances();

    let result = vault.settle(&order, WETH_QTY + 1, &EXCHANGE);

    assert_eq!(
        result,
        Err(SettleError::Fill(FillError::OverFill {
            requested: WETH_QTY + 1,
            remaining: WETH_QTY,
        }))
    );
    assert_eq!(vault.balances(), before);
    assert_eq!(vault.filled_quantity(&order.order_hash(&EXCHANGE)), 0);
}

#[test]
fn test_fee_shortfall_aborts_whole_fill() {
    let market = Market::new();
    let mut vault = market.vault(&[("WETH", ONE), ("MLN", 0), ("ZRX", ZRX_FEE - 1)]);
    let order = market.sign(
        ZeroExV2Order::new(market.mln_for_weth(MLN_QTY, WETH_QTY, Some(ZRX_FEE))),
        &EXCHANGE,
    );
    let before = vault.balances();

    let result = vault.settle(&order, WETH_QTY, &EXCHANGE);

    assert!(matches!(result, Err(SettleError::Ledger(_))));
    assert_eq!(vault.balances(), before);
    assert_eq!(vault.order_state(&order, &EXCHANGE), OrderState::Unseen);
}

// =========================================================================
// Partial fills
// =========================================================================

#[test]
fn test_half_fill_halves_every_leg() {
    let market = Market::new();
    let mut vault = market.vault(&[("WETH", ONE), ("MLN", 0), ("ZRX", ONE)]);
    let order = market.sign(
        ZeroExV2Order::new(market.mln_for_weth(MLN_QTY, WETH_QTY, Some(ZRX_FEE))),
        &EXCHANGE,
    );

    let record = vault.settle(&order, WETH_QTY / 2, &EXCHANGE).unwrap();

    assert_eq!(record.buy_amount(), MLN_QTY / 2);
    assert_eq!(record.sell_amount(), WETH_QTY / 2);
    assert_eq!(record.fee_amounts(), &[ZRX_FEE / 2]);
    assert_eq!(vault.order_state(&order, &EXCHANGE), OrderState::PartiallyFilled);
}

#[test]
fn test_partial_fills_until_exhausted() {
    let market = Market::new();
    let mut vault = market.vault(&[("WETH", ONE), ("MLN", 0), ("ZRX", ONE)]);
    let order = market.sign(
        ZeroExV2Order::new(market.mln_for_weth(MLN_QTY, WETH_QTY, Some(ZRX_FEE))),
        &EXCHANGE,
    );
    let mut journal = TradeJournal::new();

    for quantity in [WETH_QTY / 5, WETH_QTY / 5, WETH_QTY * 3 / 5] {
        let record = vault.settle(&order, quantity, &EXCHANGE).unwrap();
        journal.record(record);
    }

    assert_eq!(vault.filled_quantity(&order.order_hash(&EXCHANGE)), WETH_QTY);
    assert_eq!(journal.sold(&asset("WETH")), WETH_QTY);
    assert_eq!(journal.bought(&asset("MLN")), MLN_QTY);
    assert_eq!(journal.fees_paid(&asset("ZRX")), ZRX_FEE);
    assert_eq!(vault.balance_of(&asset("ZRX")).unwrap(), ONE - ZRX_FEE);

    let hash = order.order_hash(&EXCHANGE);
    assert_eq!(
        vault.settle(&order, 1, &EXCHANGE),
        Err(SettleError::OrderExhausted(hash))
    );
}

#[test]
fn test_uneven_partials_never_exceed_order_terms() {
    let market = Market::new();
    let mut vault = market.vault(&[("WETH", ONE), ("MLN", 0), ("ZRX", ONE)]);
    // 7 MLN-units for 3 WETH-units: every partial truncates
    let order = market.sign(
        ZeroExV2Order::new(market.mln_for_weth(7, 3, Some(5))),
        &EXCHANGE,
    );

    for _ in 0..3 {
        vault.settle(&order, 1, &EXCHANGE).unwrap();
    }

    let received = vault.balance_of(&asset("MLN")).unwrap();
    let fees = ONE - vault.balance_of(&asset("ZRX")).unwrap();
    assert_eq!(received, 3 * (7 / 3));
    assert!(received <= 7);
    assert_eq!(fees, 3 * (5 / 3));
}
