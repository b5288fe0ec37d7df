//! Integration test: one settlement pipeline across order formats.
//!
//! Covers 0x v3 protocol fees, encoded take-order arguments, and the
//! signature binding of orders to their format and exchange.

use tradevault_core::Address;
use tradevault_integration_tests::{asset, Market, EXCHANGE, ONE};
use tradevault_settlement::{
    encode_take_order_args, AdapterKind, AdapterOrder, ProtocolFee, SettleError,
    VerificationError, ZeroExV2Order, ZeroExV3Order,
};

#[test]
fn test_v3_protocol_fee_paid_per_fill() {
    let market = Market::new();
    let mut vault = market.vault(&[("WETH", ONE), ("MLN", 0), ("ZRX", ONE)]);
    let protocol_fee = ProtocolFee {
        asset: asset("WETH"),
        quantity: 1_000,
    };
    let order = market.sign(
        ZeroExV3Order::new(
            market.mln_for_weth(ONE, ONE / 20, Some(ONE / 10_000)),
            Some(protocol_fee),
        ),
        &EXCHANGE,
    );

    let first = vault.settle(&order, ONE / 40, &EXCHANGE).unwrap();
    let second = vault.settle(&order, ONE / 40, &EXCHANGE).unwrap();

    for record in [&first, &second] {
        assert_eq!(record.fee_assets(), &[asset("ZRX"), asset("WETH")]);
        assert_eq!(record.fee_amounts(), &[ONE / 20_000, 1_000]);
        assert_eq!(record.fee_assets().len(), record.fee_amounts().len());
    }
    assert_eq!(
        vault.balance_of(&asset("WETH")).unwrap(),
        ONE - ONE / 20 - 2 * 1_000
    );
    assert_eq!(vault.balance_of(&asset("MLN")).unwrap(), ONE);
}

#[test]
fn test_v2_signature_does_not_verify_as_v3() {
    let market = Market::new();
    let vault = market.vault(&[("WETH", ONE), ("MLN", 0)]);
    let terms = market.mln_for_weth(ONE, ONE / 20, None);

    let v2 = market.sign(ZeroExV2Order::new(terms), &EXCHANGE);
    let as_v3 = AdapterOrder::from(ZeroExV3Order::new(v2.order().clone(), None));

    assert_eq!(vault.verify(&v2, &EXCHANGE), Ok(()));
    assert!(matches!(
        vault.verify(&as_v3, &EXCHANGE),
        Err(VerificationError::InvalidSignature { .. })
    ));
}

#[test]
fn test_order_bound_to_exchange() {
    let market = Market::new();
    let mut vault = market.vault(&[("WETH", ONE), ("MLN", 0)]);
    let order = market.sign(
        ZeroExV2Order::new(market.mln_for_weth(ONE, ONE / 20, None)),
        &EXCHANGE,
    );
    let elsewhere = Address::from_bytes([0x99; 20]);

    let result = vault.settle(&order, ONE / 20, &elsewhere);

    assert!(matches!(
        result,
        Err(SettleError::Verification(VerificationError::InvalidSignature { .. }))
    ));
    assert_eq!(vault.balance_of(&asset("WETH")).unwrap(), ONE);
}

#[test]
fn test_encoded_take_order_settles() {
    let market = Market::new();
    let mut vault = market.vault(&[("WETH", ONE), ("MLN", 0), ("ZRX", ONE)]);
    let order = market.sign(
        ZeroExV3Order::new(market.mln_for_weth(ONE, ONE / 20, Some(ONE / 10_000)), None),
        &EXCHANGE,
    );
    let args = encode_take_order_args(&order, ONE / 20);

    let record = vault
        .settle_encoded(AdapterKind::ZeroExV3, &args, &EXCHANGE)
        .expect("encoded order should settle");

    assert_eq!(record.buy_amount(), ONE);
    assert_eq!(record.fee_amounts(), &[ONE / 10_000]);
    assert_eq!(vault.filled_quantity(&order.order_hash(&EXCHANGE)), ONE / 20);
}

#[test]
fn test_encoded_args_for_wrong_kind_rejected() {
    let market = Market::new();
    let mut vault = market.vault(&[("WETH", ONE), ("MLN", 0)]);
    let order = market.sign(
        ZeroExV2Order::new(market.mln_for_weth(ONE, ONE / 20, None)),
        &EXCHANGE,
    );
    let args = encode_take_order_args(&order, ONE / 20);

    let result = vault.settle_encoded(AdapterKind::ZeroExV3, &args, &EXCHANGE);

    assert!(matches!(
        result,
        Err(SettleError::Verification(VerificationError::Malformed(_)))
    ));
    assert_eq!(vault.balance_of(&asset("WETH")).unwrap(), ONE);
}

#[test]
fn test_tampered_encoded_quantity_field_rejected() {
    let market = Market::new();
    let mut vault = market.vault(&[("WETH", ONE), ("MLN", 0)]);
    let order = market.sign(
        ZeroExV2Order::new(market.mln_for_weth(ONE, ONE / 20, None)),
        &EXCHANGE,
    );
    let mut args = encode_take_order_args(&order, ONE / 20).to_vec();
    // tag(1) + maker(20) + "MLN"(4+3) + "WETH"(4+4), then the maker quantity
    let maker_qty_last_byte = 1 + 20 + 7 + 8 + 15;
    args[maker_qty_last_byte] ^= 0x01;

    let result = vault.settle_encoded(AdapterKind::ZeroExV2, &args, &EXCHANGE);

    assert!(matches!(
        result,
        Err(SettleError::Verification(VerificationError::InvalidSignature { .. }))
    ));
}
