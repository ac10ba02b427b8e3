//! Storage boundaries for products, transfers and POS transactions.
//!
//! Each trait exposes its precondition-carrying writes as single calls
//! (filter and mutation together) so an implementation can map them onto one
//! atomic conditional update. Callers never read-then-write to enforce a
//! precondition.

pub mod error;
pub mod pos;
pub mod product;
pub mod transfer;

pub use error::StoreError;
pub use pos::{InMemoryPosStore, PosTransactionStore};
pub use product::{InMemoryProductStore, ProductStore, Upserted};
pub use transfer::{InMemoryTransferStore, TransferStore};
