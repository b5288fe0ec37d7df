use std::collections::BTreeMap;

use serde::Serialize;
use tradevault_core::{Address, AssetId, Quantity};

use crate::error::LedgerError;

/// Signed change to one asset balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Delta {
    Credit(Quantity),
    Debit(Quantity),
}

impl Delta {
    pub fn is_debit(&self) -> bool {
        matches!(self, Delta::Debit(_))
    }

    pub fn quantity(&self) -> Quantity {
        match self {
            Delta::Credit(q) | Delta::Debit(q) => *q,
        }
    }
}

/// A balance change together with the identity on the other side of the transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerDelta {
    pub asset: AssetId,
    pub delta: Delta,
    /// `None` for inflows that have no settlement counterparty (deposits).
    pub counterparty: Option<Address>,
}

/// All deltas of one fill. Debits are kept ahead of credits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeltaGroup {
    entries: Vec<LedgerDelta>,
}

impl DeltaGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vault sends `quantity` of `asset` to `to`.
    pub fn debit(mut self, asset: AssetId, quantity: Quantity, to: Address) -> Self {
        self.push(LedgerDelta {
            asset,
            delta: Delta::Debit(quantity),
            counterparty: Some(to),
        });
        self
    }

    /// Vault receives `quantity` of `asset` from `from`.
    pub fn credit(mut self, asset: AssetId, quantity: Quantity, from: Address) -> Self {
        self.push(LedgerDelta {
            asset,
            delta: Delta::Credit(quantity),
            counterparty: Some(from),
        });
        self
    }

    pub fn push(&mut self, entry: LedgerDelta) {
        if entry.delta.is_debit() {
            let at = self
                .entries
                .iter()
                .position(|e| !e.delta.is_debit())
                .unwrap_or(self.entries.len());
            self.entries.insert(at, entry);
        } else {
            self.entries.push(entry);
        }
    }

    pub fn entries(&self) -> &[LedgerDelta] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Post-group balances computed by [`Ledger::prepare`], not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedGroup {
    balances: Vec<(AssetId, Quantity)>,
}

impl PreparedGroup {
    /// Balance each touched asset will hold once committed.
    pub fn balance_after(&self, asset: &AssetId) -> Option<Quantity> {
        self.balances
            .iter()
            .find(|(a, _)| a == asset)
            .map(|(_, q)| *q)
    }
}

#[derive(Default)]
struct Net {
    credit: Quantity,
    debit: Quantity,
    debit_overflow: bool,
}

/// Custodial balances of the vault, one entry per onboarded asset.
///
/// Balances are unsigned and never go below zero: groups are validated in
/// full by [`Ledger::prepare`] before [`Ledger::commit`] writes anything.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    balances: BTreeMap<AssetId, Quantity>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a zero-balance entry. Returns `false` if the asset was already onboarded.
    pub fn onboard(&mut self, asset: AssetId) -> bool {
        if self.balances.contains_key(&asset) {
            return false;
        }
        tracing::info!(asset = %asset, "Onboarding asset");
        self.balances.insert(asset, 0);
        true
    }

    pub fn contains(&self, asset: &AssetId) -> bool {
        self.balances.contains_key(asset)
    }

    pub fn balance_of(&self, asset: &AssetId) -> Result<Quantity, LedgerError> {
        self.balances
            .get(asset)
            .copied()
            .ok_or_else(|| LedgerError::UnknownAsset(asset.clone()))
    }

    /// Snapshot of every balance.
    pub fn balances(&self) -> BTreeMap<AssetId, Quantity> {
        self.balances.clone()
    }

    /// Apply a single delta.
    pub fn apply_delta(&mut self, asset: &AssetId, delta: Delta) -> Result<(), LedgerError> {
        let mut group = DeltaGroup::new();
        group.push(LedgerDelta {
            asset: asset.clone(),
            delta,
            counterparty: None,
        });
        self.apply_group(&group)
    }

    /// Apply every delta of `group` or none of them.
    pub fn apply_group(&mut self, group: &DeltaGroup) -> Result<(), LedgerError> {
        let prepared = self.prepare(group)?;
        self.commit(prepared);
        Ok(())
    }

    /// Validate `group` against current balances without mutating anything.
    ///
    /// Deltas are netted per asset. Assets with a net debit are checked before
    /// those with a net credit, so an insufficient balance is reported ahead of
    /// an overflow.
    pub fn prepare(&self, group: &DeltaGroup) -> Result<PreparedGroup, LedgerError> {
        let mut nets: BTreeMap<&AssetId, Net> = BTreeMap::new();
        for entry in group.entries() {
            if !self.balances.contains_key(&entry.asset) {
                return Err(LedgerError::UnknownAsset(entry.asset.clone()));
            }
            let net = nets.entry(&entry.asset).or_default();
            match entry.delta {
                Delta::Credit(q) => {
                    net.credit = net
                        .credit
                        .checked_add(q)
                        .ok_or_else(|| LedgerError::BalanceOverflow(entry.asset.clone()))?;
                }
                Delta::Debit(q) => match net.debit.checked_add(q) {
                    Some(sum) => net.debit = sum,
                    None => net.debit_overflow = true,
                },
            }
        }

        let mut balances = Vec::with_capacity(nets.len());
        let (debits, credits): (Vec<_>, Vec<_>) = nets
            .into_iter()
            .partition(|(_, net)| net.debit_overflow || net.debit > net.credit);

        for (asset, net) in debits {
            let available = self.balance_of(asset)?;
            let required = if net.debit_overflow {
                Quantity::MAX
            } else {
                net.debit - net.credit
            };
            if net.debit_overflow || available < required {
                return Err(LedgerError::InsufficientBalance {
                    asset: asset.clone(),
                    available,
                    required,
                });
            }
            balances.push((asset.clone(), available - required));
        }

        for (asset, net) in credits {
            let available = self.balance_of(asset)?;
            let updated = available
                .checked_add(net.credit - net.debit)
                .ok_or_else(|| LedgerError::BalanceOverflow(asset.clone()))?;
            balances.push((asset.clone(), updated));
        }

        Ok(PreparedGroup { balances })
    }

    /// Write balances produced by [`Ledger::prepare`].
    pub fn commit(&mut self, prepared: PreparedGroup) {
        for (asset, balance) in prepared.balances {
            tracing::debug!(asset = %asset, balance = %balance, "Ledger balance updated");
            self.balances.insert(asset, balance);
        }
    }
}
