use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tradevault_core::{AssetId, Quantity};
use uuid::Uuid;

use crate::types::FillRecord;

/// Receives every fill record the vault emits, in settlement order.
pub trait FillObserver: Send {
    fn on_fill(&mut self, record: &FillRecord);
}

/// A fill record as stored by the journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub record: FillRecord,
}

/// Append-only log of settled fills with per-asset aggregates.
///
/// This is the input fee accrual works from: what was bought, sold and paid
/// in fees, per asset.
#[derive(Debug, Clone, Default)]
pub struct TradeJournal {
    entries: Vec<JournalEntry>,
}

impl TradeJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: FillRecord) -> &JournalEntry {
        self.entries.push(JournalEntry {
            id: Uuid::now_v7(),
            recorded_at: Utc::now(),
            record,
        });
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total quantity of `asset` received by the vault.
    pub fn bought(&self, asset: &AssetId) -> Quantity {
        self.sum(|r| (r.buy_asset() == asset).then_some(r.buy_amount()))
    }

    /// Total quantity of `asset` given up as the sell leg of fills.
    pub fn sold(&self, asset: &AssetId) -> Quantity {
        self.sum(|r| (r.sell_asset() == asset).then_some(r.sell_amount()))
    }

    /// Total quantity of `asset` paid out across every fee leg.
    pub fn fees_paid(&self, asset: &AssetId) -> Quantity {
        self.entries
            .iter()
            .flat_map(|e| e.record.fees())
            .filter(|(a, _)| *a == asset)
            .fold(0, |acc: Quantity, (_, q)| acc.saturating_add(q))
    }

    /// Signed change in the vault's `asset` holdings: bought minus sold minus fees.
    pub fn net_flow(&self, asset: &AssetId) -> i128 {
        let inflow = clamp_i128(self.bought(asset));
        let outflow = clamp_i128(self.sold(asset)).saturating_add(clamp_i128(self.fees_paid(asset)));
        inflow.saturating_sub(outflow)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.entries)
    }

    fn sum(&self, f: impl Fn(&FillRecord) -> Option<Quantity>) -> Quantity {
        self.entries
            .iter()
            .filter_map(|e| f(&e.record))
            .fold(0, |acc: Quantity, q| acc.saturating_add(q))
    }
}

fn clamp_i128(q: Quantity) -> i128 {
    i128::try_from(q).unwrap_or(i128::MAX)
}

impl FillObserver for TradeJournal {
    fn on_fill(&mut self, record: &FillRecord) {
        let entry = self.record(record.clone());
        tracing::debug!(entry_id = %entry.id, "Fill journaled");
    }
}

/// Cloneable handle to a journal shared between the vault and its readers.
#[derive(Debug, Clone, Default)]
pub struct SharedJournal(Arc<Mutex<TradeJournal>>);

impl SharedJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the journal. A poisoned lock is recovered since entries are only appended.
    pub fn lock(&self) -> MutexGuard<'_, TradeJournal> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FillObserver for SharedJournal {
    fn on_fill(&mut self, record: &FillRecord) {
        self.lock().on_fill(record);
    }
}
