use tradevault_core::{Address, AssetId, CoreError, OrderHash, Quantity};

/// Why an order failed authenticity or validity checks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    #[error("invalid signature for maker {maker}")]
    InvalidSignature { maker: Address },

    #[error("order expired at {expiry} (now {now})")]
    Expired { expiry: u64, now: u64 },

    #[error("malformed order: {0}")]
    Malformed(String),
}

impl From<CoreError> for VerificationError {
    fn from(err: CoreError) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// Why a requested fill size was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FillError {
    #[error("taker fill quantity {requested} exceeds remaining fillable quantity {remaining}")]
    OverFill {
        requested: Quantity,
        remaining: Quantity,
    },

    #[error("taker fill quantity must be greater than zero")]
    ZeroFill,
}

/// Vault balance errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("insufficient {asset} balance: available {available}, required {required}")]
    InsufficientBalance {
        asset: AssetId,
        available: Quantity,
        required: Quantity,
    },

    #[error("asset not onboarded to the vault: {0}")]
    UnknownAsset(AssetId),

    #[error("{0} balance would overflow")]
    BalanceOverflow(AssetId),
}

/// Settlement errors. Component errors pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettleError {
    #[error("order {0} is already fully filled")]
    OrderExhausted(OrderHash),

    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error(transparent)]
    Fill(#[from] FillError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
