use serde::{Deserialize, Serialize};
use tradevault_core::Order;

use super::{AdapterKind, OrderFormat};

/// 0x v2 order: the common order terms with a single proportional taker fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZeroExV2Order {
    pub order: Order,
}

impl ZeroExV2Order {
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}

impl OrderFormat for ZeroExV2Order {
    fn kind(&self) -> AdapterKind {
        AdapterKind::ZeroExV2
    }

    fn order(&self) -> &Order {
        &self.order
    }
}
