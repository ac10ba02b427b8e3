//! Inventory domain module: per-branch products and stock ledger steps.
//!
//! This crate contains business rules for catalog snapshots and ledger
//! mutations, implemented purely as deterministic domain logic (no IO, no
//! storage). The guarded writes themselves live behind the storage traits in
//! `stockline-infra`.

pub mod ledger;
pub mod product;

pub use ledger::StockMutation;
pub use product::{Product, ProductSnapshot, ProductUnit};
