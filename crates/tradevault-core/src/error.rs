use crate::order_state::OrderState;

/// Core protocol errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid order state transition from {from} to {to}")]
    InvalidStateTransition { from: OrderState, to: OrderState },

    #[error("order validation failed: {0}")]
    ValidationError(String),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid asset id: {0}")]
    InvalidAsset(String),

    #[error("decode error: {0}")]
    DecodeError(String),
}
