use serde::Serialize;
use tradevault_core::{Address, AssetId, OrderHash, OrderState, Quantity};

use crate::adapters::AdapterKind;
use crate::ledger::{DeltaGroup, PreparedGroup};

/// One fee payment owed by the vault for a fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeeLeg {
    pub asset: AssetId,
    pub amount: Quantity,
    pub recipient: Address,
}

/// Exact quantities moved by one fill, from the vault's (taker's) side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FillResult {
    /// Counterparty that receives the taker asset and sends the maker asset.
    pub maker: Address,
    pub maker_asset: AssetId,
    /// Floor of `maker_quantity * taker_fill_quantity / taker_quantity`.
    pub maker_fill_quantity: Quantity,
    pub taker_asset: AssetId,
    pub taker_fill_quantity: Quantity,
    /// Empty when the order carries no fee.
    pub fees: Vec<FeeLeg>,
}

/// Structured record of a settled fill, in the shape downstream accounting
/// consumers expect. `fee_assets` and `fee_amounts` always have equal length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FillRecord {
    target: Address,
    buy_asset: AssetId,
    buy_amount: Quantity,
    sell_asset: AssetId,
    sell_amount: Quantity,
    fee_assets: Vec<AssetId>,
    fee_amounts: Vec<Quantity>,
}

impl FillRecord {
    /// Build a record; fee legs are split into the parallel sequences.
    pub fn new(
        target: Address,
        buy: (AssetId, Quantity),
        sell: (AssetId, Quantity),
        fees: &[FeeLeg],
    ) -> Self {
        let (fee_assets, fee_amounts) = fees
            .iter()
            .map(|leg| (leg.asset.clone(), leg.amount))
            .unzip();
        Self {
            target,
            buy_asset: buy.0,
            buy_amount: buy.1,
            sell_asset: sell.0,
            sell_amount: sell.1,
            fee_assets,
            fee_amounts,
        }
    }

    /// Record for a computed fill: the vault buys the maker asset and sells the taker asset.
    pub fn from_fill(target: Address, fill: &FillResult) -> Self {
        Self::new(
            target,
            (fill.maker_asset.clone(), fill.maker_fill_quantity),
            (fill.taker_asset.clone(), fill.taker_fill_quantity),
            &fill.fees,
        )
    }

    pub fn target(&self) -> &Address {
        &self.target
    }

    pub fn buy_asset(&self) -> &AssetId {
        &self.buy_asset
    }

    pub fn buy_amount(&self) -> Quantity {
        self.buy_amount
    }

    pub fn sell_asset(&self) -> &AssetId {
        &self.sell_asset
    }

    pub fn sell_amount(&self) -> Quantity {
        self.sell_amount
    }

    pub fn fee_assets(&self) -> &[AssetId] {
        &self.fee_assets
    }

    pub fn fee_amounts(&self) -> &[Quantity] {
        &self.fee_amounts
    }

    /// Fee legs as `(asset, amount)` pairs.
    pub fn fees(&self) -> impl Iterator<Item = (&AssetId, Quantity)> {
        self.fee_assets.iter().zip(self.fee_amounts.iter().copied())
    }

    /// Serialize to the JSON wire shape.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// A fully validated fill that has not yet been committed.
///
/// Produced by [`crate::Vault::preview`]; holds everything `settle` would
/// apply, including the post-fill balances of every touched asset.
#[derive(Debug, Clone)]
pub struct SettlementPlan {
    pub order_hash: OrderHash,
    pub kind: AdapterKind,
    pub fill: FillResult,
    pub deltas: DeltaGroup,
    /// Cumulative taker quantity filled once this plan is committed.
    pub filled_after: Quantity,
    /// Order state once this plan is committed.
    pub state_after: OrderState,
    pub record: FillRecord,
    pub(crate) prepared: PreparedGroup,
}
