use std::collections::HashMap;

use tradevault_core::{OrderHash, Quantity};

/// Cumulative taker quantity filled per order, keyed by order hash.
///
/// Entries are created lazily on the first fill and only ever increase.
#[derive(Debug, Clone, Default)]
pub struct FillBook {
    filled: HashMap<OrderHash, Quantity>,
}

impl FillBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantity filled so far; zero for orders never seen.
    pub fn filled(&self, hash: &OrderHash) -> Quantity {
        self.filled.get(hash).copied().unwrap_or(0)
    }

    /// Unfilled taker quantity of an order of size `taker_quantity`.
    pub fn remaining(&self, hash: &OrderHash, taker_quantity: Quantity) -> Quantity {
        taker_quantity.saturating_sub(self.filled(hash))
    }

    /// Add `quantity` to the order's counter and return the new total.
    pub(crate) fn record(&mut self, hash: OrderHash, quantity: Quantity) -> Quantity {
        let entry = self.filled.entry(hash).or_insert(0);
        *entry = entry.saturating_add(quantity);
        *entry
    }

    /// Number of orders with at least one fill.
    pub fn len(&self) -> usize {
        self.filled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filled.is_empty()
    }
}
