//! Point-of-sale domain module.
//!
//! Server-side pricing, totals, receipt numbering and the `PAID → VOID`
//! lifecycle of a sale. Stock movement and persistence are orchestrated in
//! `stockline-infra`; nothing here performs IO.

pub mod display;
pub mod event;
pub mod transaction;

pub use display::{PosHistoryEntry, format_display_time, format_idr};
pub use event::{PosChanged, PosEvent};
pub use transaction::{
    CheckoutLine, CheckoutRequest, PaymentMethod, PosItem, PosStatus, PosTotals, PosTransaction,
    ValidatedCheckout, VoidAudit, receipt_number,
};
