//! Stock Transfer domain module.
//!
//! This crate contains the inter-branch transfer record and its four-state
//! lifecycle (`PENDING_WAREHOUSE → WAITING_DRIVER → IN_PROGRESS → DONE`),
//! implemented purely as deterministic domain logic. Stock movement and the
//! guarded persistence of transitions are orchestrated in `stockline-infra`.

pub mod event;
pub mod transfer;

pub use event::{TransferChanged, TransferEvent};
pub use transfer::{
    CreateTransfer, StageAudit, StockTransfer, TransferItem, TransferLine, TransferStage,
    TransferStatus, TransitionGuard, ValidatedTransfer,
};
