//! Tradevault Settlement Layer
//!
//! Settles maker-signed orders against the vault's pooled holdings: checks the
//! maker's signature, derives exact proportional fill quantities, applies the
//! resulting balance deltas as one atomic group, and emits a fill record for
//! downstream accounting. Multiple external order formats are settled through
//! the same pipeline via [`adapters::AdapterOrder`].

pub mod adapters;
pub mod engine;
pub mod error;
pub mod fill;
pub mod fill_book;
pub mod journal;
pub mod ledger;
pub mod types;
pub mod verifier;

pub use adapters::{
    decode_take_order_args, encode_take_order_args, AdapterKind, AdapterOrder, OrderFormat,
    ProtocolFee, ZeroExV2Order, ZeroExV3Order,
};
pub use engine::Vault;
pub use error::{FillError, LedgerError, SettleError, VerificationError};
pub use fill::compute_fill;
pub use fill_book::FillBook;
pub use journal::{FillObserver, JournalEntry, SharedJournal, TradeJournal};
pub use ledger::{Delta, DeltaGroup, Ledger, LedgerDelta, PreparedGroup};
pub use types::{FeeLeg, FillRecord, FillResult, SettlementPlan};
pub use verifier::OrderVerifier;
