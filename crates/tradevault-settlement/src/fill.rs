use primitive_types::U256;
use tradevault_core::{Order, Quantity};

use crate::error::FillError;
use crate::types::{FeeLeg, FillResult};

/// Derive the exact quantities moved by filling `taker_fill_quantity` of `order`.
///
/// `remaining` is the order's unfilled taker quantity as tracked by the caller.
/// Maker and fee amounts are computed independently as
/// `floor(x * taker_fill_quantity / taker_quantity)` in 256-bit arithmetic, so
/// any rounding loss is borne by the maker and fee recipient. A fee leg is
/// emitted whenever the order carries a non-zero fee quantity, even if the
/// proportional amount for this fill truncates to zero.
pub fn compute_fill(
    order: &Order,
    taker_fill_quantity: Quantity,
    remaining: Quantity,
) -> Result<FillResult, FillError> {
    if taker_fill_quantity == 0 {
        return Err(FillError::ZeroFill);
    }
    let remaining = remaining.min(order.taker_quantity);
    if taker_fill_quantity > remaining {
        return Err(FillError::OverFill {
            requested: taker_fill_quantity,
            remaining,
        });
    }

    let maker_fill_quantity = proportion(
        order.maker_quantity,
        taker_fill_quantity,
        order.taker_quantity,
    );

    let fees = order
        .fee
        .iter()
        .filter(|fee| fee.quantity > 0)
        .map(|fee| FeeLeg {
            asset: fee.asset.clone(),
            amount: proportion(fee.quantity, taker_fill_quantity, order.taker_quantity),
            recipient: fee.recipient,
        })
        .collect();

    Ok(FillResult {
        maker: order.maker,
        maker_asset: order.maker_asset.clone(),
        maker_fill_quantity,
        taker_asset: order.taker_asset.clone(),
        taker_fill_quantity,
        fees,
    })
}

/// `floor(amount * numerator / denominator)` without intermediate overflow.
///
/// Callers guarantee `numerator <= denominator` and `denominator > 0`, so the
/// quotient always fits back into a `u128`.
fn proportion(amount: Quantity, numerator: Quantity, denominator: Quantity) -> Quantity {
    let wide = U256::from(amount) * U256::from(numerator) / U256::from(denominator);
    wide.low_u128()
}
