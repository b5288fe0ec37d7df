use std::collections::BTreeMap;
use std::sync::Arc;

use tradevault_core::{
    Address, AssetId, Clock, OrderEvent, OrderHash, OrderState, OrderStateMachine, Quantity,
    SignatureVerifier, VaultConfig,
};

use crate::adapters::{decode_take_order_args, AdapterKind, AdapterOrder};
use crate::error::{LedgerError, SettleError, VerificationError};
use crate::fill::compute_fill;
use crate::fill_book::FillBook;
use crate::journal::FillObserver;
use crate::ledger::{Delta, DeltaGroup, Ledger};
use crate::types::{FillRecord, SettlementPlan};
use crate::verifier::OrderVerifier;

/// The custodial vault and its settlement engine.
///
/// `settle` is the only entry point that mutates balances or fill counters.
/// Every fill is first planned in full (verification, remaining quantity,
/// fill amounts, ledger validation) against an immutable view of the vault,
/// and only a complete plan is committed. A rejected call therefore leaves
/// the vault exactly as it was.
pub struct Vault {
    address: Address,
    ledger: Ledger,
    fill_book: FillBook,
    verifier: OrderVerifier,
    observers: Vec<Box<dyn FillObserver>>,
}

impl Vault {
    /// Create an empty vault trading as `address`.
    pub fn new(
        address: Address,
        signatures: Arc<dyn SignatureVerifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            address,
            ledger: Ledger::new(),
            fill_book: FillBook::new(),
            verifier: OrderVerifier::new(signatures, clock),
            observers: Vec::new(),
        }
    }

    /// Create a vault and onboard every configured asset with its opening balance.
    pub fn from_config(
        config: &VaultConfig,
        signatures: Arc<dyn SignatureVerifier>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, LedgerError> {
        let mut vault = Self::new(config.vault.address, signatures, clock);
        for asset in &config.assets {
            vault.onboard_asset(asset.id.clone());
            if asset.initial_balance > 0 {
                vault.deposit(&asset.id, asset.initial_balance)?;
            }
        }
        tracing::info!(
            name = %config.vault.name,
            address = %vault.address,
            assets = vault.ledger.balances().len(),
            "Vault initialized from config"
        );
        Ok(vault)
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Add a zero-balance ledger entry for `asset`. Idempotent.
    pub fn onboard_asset(&mut self, asset: AssetId) -> bool {
        self.ledger.onboard(asset)
    }

    /// Credit an investment inflow to an onboarded asset.
    pub fn deposit(&mut self, asset: &AssetId, quantity: Quantity) -> Result<(), LedgerError> {
        self.ledger.apply_delta(asset, Delta::Credit(quantity))?;
        tracing::info!(asset = %asset, quantity = %quantity, "Deposit credited");
        Ok(())
    }

    pub fn balance_of(&self, asset: &AssetId) -> Result<Quantity, LedgerError> {
        self.ledger.balance_of(asset)
    }

    pub fn balances(&self) -> BTreeMap<AssetId, Quantity> {
        self.ledger.balances()
    }

    /// Check an order's authenticity and validity without touching any state.
    pub fn verify(&self, order: &AdapterOrder, target: &Address) -> Result<(), VerificationError> {
        self.verifier.verify(order, target)
    }

    /// Taker quantity already filled for the order with this hash.
    pub fn filled_quantity(&self, hash: &OrderHash) -> Quantity {
        self.fill_book.filled(hash)
    }

    /// Lifecycle state of `order` as bound to `target`.
    pub fn order_state(&self, order: &AdapterOrder, target: &Address) -> OrderState {
        let terms = order.order();
        let filled = self.fill_book.filled(&order.order_hash(target));
        let expired = terms.is_expired_at(self.verifier.now());
        OrderState::from_progress(filled, terms.taker_quantity, expired)
    }

    /// Receive a copy of every fill record from now on.
    pub fn register_observer(&mut self, observer: Box<dyn FillObserver>) {
        self.observers.push(observer);
    }

    /// Run every settlement check and return the fill that `settle` would
    /// commit, without committing it.
    pub fn preview(
        &self,
        order: &AdapterOrder,
        taker_fill_quantity: Quantity,
        target: &Address,
    ) -> Result<SettlementPlan, SettleError> {
        self.verifier.verify(order, target)?;

        let order_hash = order.order_hash(target);
        let terms = order.order();
        let filled = self.fill_book.filled(&order_hash);
        let remaining = self.fill_book.remaining(&order_hash, terms.taker_quantity);
        if remaining == 0 {
            return Err(SettleError::OrderExhausted(order_hash));
        }

        let mut fill = compute_fill(terms, taker_fill_quantity, remaining)?;
        let filled_after = filled + taker_fill_quantity;
        let state_after = OrderStateMachine::transition(
            OrderState::from_progress(filled, terms.taker_quantity, false),
            OrderEvent::for_fill(filled_after, terms.taker_quantity),
        )
        .map_err(VerificationError::from)?;

        let extra = order.extra_fee_legs(&fill, target);
        fill.fees.extend(extra);

        let mut deltas = DeltaGroup::new()
            .debit(fill.taker_asset.clone(), fill.taker_fill_quantity, fill.maker)
            .credit(fill.maker_asset.clone(), fill.maker_fill_quantity, fill.maker);
        for leg in &fill.fees {
            deltas = deltas.debit(leg.asset.clone(), leg.amount, leg.recipient);
        }
        let prepared = self.ledger.prepare(&deltas)?;

        Ok(SettlementPlan {
            order_hash,
            kind: order.kind(),
            record: FillRecord::from_fill(*target, &fill),
            filled_after,
            state_after,
            fill,
            deltas,
            prepared,
        })
    }

    /// Settle `taker_fill_quantity` of `order` against `target`.
    ///
    /// On success the ledger, the order's fill counter and every observer
    /// reflect the fill. On failure nothing changes.
    pub fn settle(
        &mut self,
        order: &AdapterOrder,
        taker_fill_quantity: Quantity,
        target: &Address,
    ) -> Result<FillRecord, SettleError> {
        match self.preview(order, taker_fill_quantity, target) {
            Ok(plan) => Ok(self.commit(plan)),
            Err(e) => {
                tracing::warn!(
                    kind = %order.kind(),
                    maker = %order.order().maker,
                    quantity = %taker_fill_quantity,
                    error = %e,
                    "Settlement rejected"
                );
                Err(e)
            }
        }
    }

    /// Decode take-order arguments for `kind` and settle them.
    pub fn settle_encoded(
        &mut self,
        kind: AdapterKind,
        args: &[u8],
        target: &Address,
    ) -> Result<FillRecord, SettleError> {
        let (order, quantity) = decode_take_order_args(kind, args).map_err(|e| {
            tracing::warn!(kind = %kind, error = %e, "Rejected undecodable take-order arguments");
            SettleError::from(e)
        })?;
        self.settle(&order, quantity, target)
    }

    fn commit(&mut self, plan: SettlementPlan) -> FillRecord {
        let SettlementPlan {
            order_hash,
            kind,
            fill,
            deltas,
            filled_after,
            state_after,
            record,
            prepared,
        } = plan;

        self.ledger.commit(prepared);
        let cumulative = self.fill_book.record(order_hash, fill.taker_fill_quantity);
        debug_assert_eq!(cumulative, filled_after);

        tracing::debug!(
            order_hash = %order_hash,
            legs = deltas.len(),
            filled = %cumulative,
            state = %state_after,
            "Delta group committed"
        );
        tracing::info!(
            order_hash = %order_hash,
            kind = %kind,
            buy_asset = %record.buy_asset(),
            buy_amount = %record.buy_amount(),
            sell_asset = %record.sell_asset(),
            sell_amount = %record.sell_amount(),
            fee_legs = record.fee_assets().len(),
            "Order filled"
        );

        for observer in &mut self.observers {
            observer.on_fill(&record);
        }
        record
    }
}
