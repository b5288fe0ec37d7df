//! External order formats settled through the shared vault pipeline.
//!
//! Each format supplies its signing domain, any signed trailer fields, and
//! the fee legs it adds on top of the proportional order fee. Everything
//! after verification (fill tracking, ledger application, records) is
//! identical across formats.

pub mod zero_ex_v2;
pub mod zero_ex_v3;

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use tradevault_core::wire;
use tradevault_core::{Address, CoreError, Order, OrderHash, Quantity, SigningDomain};

use crate::error::VerificationError;
use crate::types::{FeeLeg, FillResult};

pub use zero_ex_v2::ZeroExV2Order;
pub use zero_ex_v3::{ProtocolFee, ZeroExV3Order};

/// Supported order formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdapterKind {
    ZeroExV2,
    ZeroExV3,
}

impl AdapterKind {
    /// Domain tag written into the canonical encoding and the argument codec.
    pub fn tag(&self) -> u8 {
        match self {
            AdapterKind::ZeroExV2 => 0x02,
            AdapterKind::ZeroExV3 => 0x03,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0x02 => Some(AdapterKind::ZeroExV2),
            0x03 => Some(AdapterKind::ZeroExV3),
            _ => None,
        }
    }

    pub fn signing_domain(&self, target: Address) -> SigningDomain {
        SigningDomain {
            tag: self.tag(),
            target,
        }
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterKind::ZeroExV2 => write!(f, "zero-ex-v2"),
            AdapterKind::ZeroExV3 => write!(f, "zero-ex-v3"),
        }
    }
}

/// Format-specific behaviour of a signed order.
pub trait OrderFormat: Send + Sync {
    fn kind(&self) -> AdapterKind;

    /// The common order terms.
    fn order(&self) -> &Order;

    /// Append format-specific signed fields after the order fields.
    fn encode_trailer(&self, _buf: &mut BytesMut) {}

    /// Fee legs owed on top of the order's own proportional fee.
    fn extra_fee_legs(&self, _fill: &FillResult, _target: &Address) -> Vec<FeeLeg> {
        Vec::new()
    }

    /// Structural checks beyond [`Order::validate`].
    fn validate(&self) -> Result<(), CoreError> {
        self.order().validate()
    }

    /// Bytes the maker signs: canonical order encoding under this format's
    /// domain for `target`, followed by the trailer.
    fn signing_payload(&self, target: &Address) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(192);
        self.order()
            .encode_signing_payload(&self.kind().signing_domain(*target), &mut buf);
        self.encode_trailer(&mut buf);
        buf.to_vec()
    }
}

/// A signed order in one of the supported formats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterOrder {
    ZeroExV2(ZeroExV2Order),
    ZeroExV3(ZeroExV3Order),
}

impl AdapterOrder {
    pub fn format(&self) -> &dyn OrderFormat {
        match self {
            AdapterOrder::ZeroExV2(o) => o as &dyn OrderFormat,
            AdapterOrder::ZeroExV3(o) => o as &dyn OrderFormat,
        }
    }

    pub fn kind(&self) -> AdapterKind {
        self.format().kind()
    }

    pub fn order(&self) -> &Order {
        self.format().order()
    }

    pub fn signing_payload(&self, target: &Address) -> Vec<u8> {
        self.format().signing_payload(target)
    }

    /// Durable identity of the order as bound to `target`.
    pub fn order_hash(&self, target: &Address) -> OrderHash {
        tradevault_crypto::order_hash(&self.signing_payload(target))
    }

    pub fn extra_fee_legs(&self, fill: &FillResult, target: &Address) -> Vec<FeeLeg> {
        self.format().extra_fee_legs(fill, target)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        self.format().validate()
    }

    /// Return a copy carrying the given maker signature.
    pub fn with_signature(self, signature: Vec<u8>) -> Self {
        match self {
            AdapterOrder::ZeroExV2(mut o) => {
                o.order.signature = signature;
                AdapterOrder::ZeroExV2(o)
            }
            AdapterOrder::ZeroExV3(mut o) => {
                o.order.signature = signature;
                AdapterOrder::ZeroExV3(o)
            }
        }
    }
}

impl From<ZeroExV2Order> for AdapterOrder {
    fn from(order: ZeroExV2Order) -> Self {
        AdapterOrder::ZeroExV2(order)
    }
}

impl From<ZeroExV3Order> for AdapterOrder {
    fn from(order: ZeroExV3Order) -> Self {
        AdapterOrder::ZeroExV3(order)
    }
}

/// Encode the arguments of a take-order call: format tag, order fields,
/// signature, format trailer, then the requested taker fill quantity.
pub fn encode_take_order_args(order: &AdapterOrder, taker_fill_quantity: Quantity) -> Bytes {
    let mut buf = BytesMut::with_capacity(256);
    buf.put_u8(order.kind().tag());
    order.order().encode_fields(&mut buf);
    wire::put_bytes(&mut buf, &order.order().signature);
    order.format().encode_trailer(&mut buf);
    buf.put_u128(taker_fill_quantity);
    buf.freeze()
}

/// Decode arguments produced by [`encode_take_order_args`] for an order of `kind`.
pub fn decode_take_order_args(
    kind: AdapterKind,
    args: &[u8],
) -> Result<(AdapterOrder, Quantity), VerificationError> {
    let mut buf = args;
    let tag = wire::get_u8(&mut buf, "adapter tag")?;
    if tag != kind.tag() {
        return Err(VerificationError::Malformed(format!(
            "adapter tag {:#04x} does not match {}",
            tag, kind
        )));
    }

    let mut order = Order::decode_fields(&mut buf)?;
    order.signature = wire::get_bytes(&mut buf, "signature")?;

    let adapter_order = match kind {
        AdapterKind::ZeroExV2 => AdapterOrder::ZeroExV2(ZeroExV2Order::new(order)),
        AdapterKind::ZeroExV3 => {
            AdapterOrder::ZeroExV3(ZeroExV3Order::decode_trailer(order, &mut buf)?)
        }
    };
    let quantity = wire::get_u128(&mut buf, "taker fill quantity")?;

    if !buf.is_empty() {
        return Err(VerificationError::Malformed(format!(
            "{} trailing bytes after take-order arguments",
            buf.len()
        )));
    }
    Ok((adapter_order, quantity))
}
