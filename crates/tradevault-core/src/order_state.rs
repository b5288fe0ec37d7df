use std::fmt;

use crate::error::CoreError;
use crate::types::Quantity;

/// Lifecycle of an order as seen by the vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum OrderState {
    /// No fill has been recorded yet.
    Unseen,
    /// Some, but not all, of the taker quantity has been filled.
    PartiallyFilled,
    /// The full taker quantity has been filled. Final state.
    FullyFilled,
    /// The order passed its expiry before being fully filled. Final state.
    Expired,
}

impl OrderState {
    /// Whether this is a final (terminal) state.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::FullyFilled | Self::Expired)
    }

    /// Derive the state from cumulative fill progress and the expiry check.
    ///
    /// A fully filled order stays `FullyFilled` after its expiry passes.
    pub fn from_progress(filled: Quantity, taker_quantity: Quantity, expired: bool) -> Self {
        if filled >= taker_quantity {
            Self::FullyFilled
        } else if expired {
            Self::Expired
        } else if filled == 0 {
            Self::Unseen
        } else {
            Self::PartiallyFilled
        }
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unseen => write!(f, "Unseen"),
            Self::PartiallyFilled => write!(f, "PartiallyFilled"),
            Self::FullyFilled => write!(f, "FullyFilled"),
            Self::Expired => write!(f, "Expired"),
        }
    }
}

/// Events that move an order through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderEvent {
    /// A fill that leaves some taker quantity remaining.
    PartialFill,
    /// A fill that consumes the remaining taker quantity.
    FinalFill,
    /// The expiry time was reached.
    Expire,
}

impl OrderEvent {
    /// Classify a fill by the cumulative quantity it leaves behind.
    pub fn for_fill(filled_after: Quantity, taker_quantity: Quantity) -> Self {
        if filled_after >= taker_quantity {
            Self::FinalFill
        } else {
            Self::PartialFill
        }
    }
}

/// Manages order state transitions.
///
/// Valid transitions:
/// - Unseen → PartiallyFilled (PartialFill)
/// - Unseen → FullyFilled (FinalFill)
/// - Unseen → Expired (Expire)
/// - PartiallyFilled → PartiallyFilled (PartialFill)
/// - PartiallyFilled → FullyFilled (FinalFill)
/// - PartiallyFilled → Expired (Expire)
pub struct OrderStateMachine;

impl OrderStateMachine {
    /// Attempt a state transition based on an event.
    pub fn transition(current: OrderState, event: OrderEvent) -> Result<OrderState, CoreError> {
        let new_state = match (current, event) {
            (OrderState::Unseen, OrderEvent::PartialFill) => OrderState::PartiallyFilled,
            (OrderState::Unseen, OrderEvent::FinalFill) => OrderState::FullyFilled,
            (OrderState::Unseen, OrderEvent::Expire) => OrderState::Expired,

            (OrderState::PartiallyFilled, OrderEvent::PartialFill) => OrderState::PartiallyFilled,
            (OrderState::PartiallyFilled, OrderEvent::FinalFill) => OrderState::FullyFilled,
            (OrderState::PartiallyFilled, OrderEvent::Expire) => OrderState::Expired,

            _ => {
                let target = match event {
                    OrderEvent::PartialFill => OrderState::PartiallyFilled,
                    OrderEvent::FinalFill => OrderState::FullyFilled,
                    OrderEvent::Expire => OrderState::Expired,
                };
                return Err(CoreError::InvalidStateTransition {
                    from: current,
                    to: target,
                });
            }
        };

        tracing::debug!(
            from = %current,
            to = %new_state,
            event = ?event,
            "order state transition"
        );

        Ok(new_state)
    }

    /// Check if a transition is valid without performing it.
    pub fn can_transition(current: OrderState, event: OrderEvent) -> bool {
        Self::transition(current, event).is_ok()
    }
}
