use bytes::{Buf, BufMut, BytesMut};
use serde::{Deserialize, Serialize};
use tradevault_core::wire;
use tradevault_core::{Address, AssetId, CoreError, Order, Quantity};

use super::{AdapterKind, OrderFormat};
use crate::types::{FeeLeg, FillResult};

/// Flat per-fill protocol fee paid by the taker to the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolFee {
    pub asset: AssetId,
    pub quantity: Quantity,
}

/// 0x v3 order: the common order terms plus an optional protocol fee.
///
/// The protocol fee is signed as a trailer after the order fields and is
/// charged once per fill, independent of the fill size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZeroExV3Order {
    pub order: Order,
    pub protocol_fee: Option<ProtocolFee>,
}

impl ZeroExV3Order {
    pub fn new(order: Order, protocol_fee: Option<ProtocolFee>) -> Self {
        Self {
            order,
            protocol_fee,
        }
    }

    /// Read the trailer written by [`OrderFormat::encode_trailer`].
    pub(crate) fn decode_trailer<B: Buf>(order: Order, buf: &mut B) -> Result<Self, CoreError> {
        let protocol_fee = if wire::get_flag(buf, "protocol_fee")? {
            Some(ProtocolFee {
                asset: wire::get_asset(buf, "protocol_fee_asset")?,
                quantity: wire::get_u128(buf, "protocol_fee_quantity")?,
            })
        } else {
            None
        };
        Ok(Self::new(order, protocol_fee))
    }
}

impl OrderFormat for ZeroExV3Order {
    fn kind(&self) -> AdapterKind {
        AdapterKind::ZeroExV3
    }

    fn order(&self) -> &Order {
        &self.order
    }

    fn encode_trailer(&self, buf: &mut BytesMut) {
        match &self.protocol_fee {
            Some(fee) => {
                buf.put_u8(1);
                wire::put_str(buf, fee.asset.as_str());
                buf.put_u128(fee.quantity);
            }
            None => buf.put_u8(0),
        }
    }

    fn extra_fee_legs(&self, _fill: &FillResult, target: &Address) -> Vec<FeeLeg> {
        self.protocol_fee
            .iter()
            .filter(|fee| fee.quantity > 0)
            .map(|fee| FeeLeg {
                asset: fee.asset.clone(),
                amount: fee.quantity,
                recipient: *target,
            })
            .collect()
    }
}
