use bytes::{Buf, BufMut, BytesMut};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Address, AssetId, Quantity};
use crate::wire::{self, put_str};

/// Leading bytes of every canonical order encoding.
pub const ORDER_MAGIC: &[u8; 5] = b"TVORD";

/// Version of the canonical encoding produced by [`Order::encode_signing_payload`].
pub const ORDER_ENCODING_VERSION: u8 = 1;

/// Fee owed to a third party, proportional to the taker's fill.
///
/// `quantity` is denominated against the order's full `taker_quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFee {
    pub asset: AssetId,
    pub quantity: Quantity,
    pub recipient: Address,
}

/// Binds a signature to one order format and one target exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningDomain {
    /// Format tag supplied by the adapter kind.
    pub tag: u8,
    /// Exchange or market the order is settled against.
    pub target: Address,
}

/// An immutable, maker-signed offer to exchange `maker_quantity` of
/// `maker_asset` for `taker_quantity` of `taker_asset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Originator of the order; must be the signer.
    pub maker: Address,
    /// Asset the maker gives (the vault buys it).
    pub maker_asset: AssetId,
    /// Asset the maker receives (the vault sells it).
    pub taker_asset: AssetId,
    /// Maximum quantity of `maker_asset` offered.
    pub maker_quantity: Quantity,
    /// Maximum quantity of `taker_asset` requested.
    pub taker_quantity: Quantity,
    /// Optional taker fee.
    pub fee: Option<OrderFee>,
    /// Unix timestamp (seconds) at which the order stops being valid.
    pub expiry: u64,
    /// Uniqueness token for otherwise identical orders.
    pub salt: u128,
    /// Maker signature over the canonical encoding.
    #[serde(with = "hex_bytes")]
    pub signature: Vec<u8>,
}

impl Order {
    /// Create a new OrderBuilder.
    pub fn builder() -> OrderBuilder {
        OrderBuilder::default()
    }

    /// Structural validation: positive quantities and distinct assets.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.maker.is_zero() {
            return Err(CoreError::InvalidAddress("maker must not be the zero address".into()));
        }
        if self.maker_quantity == 0 {
            return Err(CoreError::InvalidQuantity("maker quantity must be greater than zero".into()));
        }
        if self.taker_quantity == 0 {
            return Err(CoreError::InvalidQuantity("taker quantity must be greater than zero".into()));
        }
        if self.maker_asset == self.taker_asset {
            return Err(CoreError::ValidationError(format!(
                "maker and taker asset must differ, both are {}",
                self.maker_asset
            )));
        }
        Ok(())
    }

    /// Whether the order is expired at the given unix time (seconds).
    pub fn is_expired_at(&self, now: u64) -> bool {
        now >= self.expiry
    }

    /// Return a copy carrying the given signature.
    pub fn with_signature(mut self, signature: Vec<u8>) -> Self {
        self.signature = signature;
        self
    }

    /// Write the canonical encoding of this order under `domain` into `buf`.
    ///
    /// Field order and widths are fixed for a given [`ORDER_ENCODING_VERSION`];
    /// adapters may append format-specific trailers after this call.
    pub fn encode_signing_payload(&self, domain: &SigningDomain, buf: &mut BytesMut) {
        buf.put_slice(ORDER_MAGIC);
        buf.put_u8(ORDER_ENCODING_VERSION);
        buf.put_u8(domain.tag);
        buf.put_slice(domain.target.as_bytes());
        self.encode_fields(buf);
    }

    /// Canonical encoding under `domain`, without any trailer.
    pub fn signing_payload(&self, domain: &SigningDomain) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(160);
        self.encode_signing_payload(domain, &mut buf);
        buf.to_vec()
    }

    /// Write the order's fields (everything but the signature).
    pub fn encode_fields(&self, buf: &mut BytesMut) {
        buf.put_slice(self.maker.as_bytes());
        put_str(buf, self.maker_asset.as_str());
        put_str(buf, self.taker_asset.as_str());
        buf.put_u128(self.maker_quantity);
        buf.put_u128(self.taker_quantity);

        match &self.fee {
            Some(fee) => {
                buf.put_u8(1);
                put_str(buf, fee.asset.as_str());
                buf.put_u128(fee.quantity);
                buf.put_slice(fee.recipient.as_bytes());
            }
            None => buf.put_u8(0),
        }

        buf.put_u64(self.expiry);
        buf.put_u128(self.salt);
    }

    /// Read fields written by [`Order::encode_fields`]. The signature is left empty.
    pub fn decode_fields<B: Buf>(buf: &mut B) -> Result<Order, CoreError> {
        let maker = wire::get_address(buf, "maker")?;
        let maker_asset = wire::get_asset(buf, "maker_asset")?;
        let taker_asset = wire::get_asset(buf, "taker_asset")?;
        let maker_quantity = wire::get_u128(buf, "maker_quantity")?;
        let taker_quantity = wire::get_u128(buf, "taker_quantity")?;

        let fee = if wire::get_flag(buf, "fee")? {
            Some(OrderFee {
                asset: wire::get_asset(buf, "fee_asset")?,
                quantity: wire::get_u128(buf, "fee_quantity")?,
                recipient: wire::get_address(buf, "fee_recipient")?,
            })
        } else {
            None
        };

        Ok(Order {
            maker,
            maker_asset,
            taker_asset,
            maker_quantity,
            taker_quantity,
            fee,
            expiry: wire::get_u64(buf, "expiry")?,
            salt: wire::get_u128(buf, "salt")?,
            signature: Vec::new(),
        })
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}

/// Builder for constructing Order instances.
#[derive(Default)]
pub struct OrderBuilder {
    maker: Option<Address>,
    maker_asset: Option<AssetId>,
    taker_asset: Option<AssetId>,
    maker_quantity: Option<Quantity>,
    taker_quantity: Option<Quantity>,
    fee: Option<OrderFee>,
    expiry: Option<u64>,
    salt: Option<u128>,
}

impl OrderBuilder {
    /// Set the maker address.
    pub fn maker(mut self, maker: Address) -> Self {
        self.maker = Some(maker);
        self
    }

    /// Set the asset and quantity the maker gives.
    pub fn maker_side(mut self, asset: AssetId, quantity: Quantity) -> Self {
        self.maker_asset = Some(asset);
        self.maker_quantity = Some(quantity);
        self
    }

    /// Set the asset and quantity the maker wants in return.
    pub fn taker_side(mut self, asset: AssetId, quantity: Quantity) -> Self {
        self.taker_asset = Some(asset);
        self.taker_quantity = Some(quantity);
        self
    }

    /// Attach a taker fee.
    pub fn fee(mut self, asset: AssetId, quantity: Quantity, recipient: Address) -> Self {
        self.fee = Some(OrderFee {
            asset,
            quantity,
            recipient,
        });
        self
    }

    /// Set the expiry (unix seconds).
    pub fn expiry(mut self, expiry: u64) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// Set the salt. A random salt is used when not set.
    pub fn salt(mut self, salt: u128) -> Self {
        self.salt = Some(salt);
        self
    }

    /// Build the unsigned Order.
    pub fn build(self) -> Result<Order, CoreError> {
        let maker = self.maker.ok_or_else(|| CoreError::MissingField("maker".into()))?;
        let maker_asset = self
            .maker_asset
            .ok_or_else(|| CoreError::MissingField("maker_asset".into()))?;
        let taker_asset = self
            .taker_asset
            .ok_or_else(|| CoreError::MissingField("taker_asset".into()))?;
        let maker_quantity = self
            .maker_quantity
            .ok_or_else(|| CoreError::MissingField("maker_quantity".into()))?;
        let taker_quantity = self
            .taker_quantity
            .ok_or_else(|| CoreError::MissingField("taker_quantity".into()))?;
        let expiry = self.expiry.ok_or_else(|| CoreError::MissingField("expiry".into()))?;

        let order = Order {
            maker,
            maker_asset,
            taker_asset,
            maker_quantity,
            taker_quantity,
            fee: self.fee,
            expiry,
            salt: self.salt.unwrap_or_else(rand::random),
            signature: Vec::new(),
        };

        order.validate()?;
        Ok(order)
    }
}
