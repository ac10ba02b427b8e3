//! `stockline-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the stock ledger,
//! the transfer workflow and the POS engine (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod value_object;

pub use error::{DomainError, DomainResult, ErrorKind};
pub use id::{BranchId, ProductId, TenantId, TransactionId, TransferId, UserId};
pub use value_object::{Money, Quantity, ValueObject};
