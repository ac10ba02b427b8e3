//! Infrastructure layer: storage boundaries, the stock ledger and the
//! transfer/POS workflows that orchestrate it.
//!
//! Every stock change goes through [`ledger::StockLedger`], whose primitives
//! are single guarded writes on a [`store::ProductStore`]. Multi-item
//! operations record each applied step in a
//! [`compensation::CompensationLog`] and replay the inverses if a later step
//! fails.

pub mod compensation;
pub mod config;
pub mod deadline;
pub mod ledger;
pub mod notify;
pub mod pos_checkout;
pub mod query;
pub mod store;
pub mod transfer_workflow;


pub use compensation::{CompensationLog, Compensator, RollbackReport};
pub use config::{ConfigError, EngineConfig};
pub use deadline::Deadline;
pub use ledger::StockLedger;
pub use notify::Notifier;
pub use pos_checkout::PosService;
pub use query::{Page, Pagination, PosFilter, SortOrder, TransferFilter};
pub use store::{
    InMemoryPosStore, InMemoryProductStore, InMemoryTransferStore, PosTransactionStore,
    ProductStore, StoreError, TransferStore, Upserted,
};
pub use transfer_workflow::TransferService;
