//! Shared-expense splitting and balance netting
//!
//! [`split`] computes per-participant shares when a shared expense is
//! recorded; [`engine`] nets the stored Expense/Split ledger into signed
//! balances between participants. Netting is a pure read: balances are
//! recomputed from the full ledger on every query and never persisted.

pub mod engine;
pub mod split;

pub use engine::*;
pub use split::*;
