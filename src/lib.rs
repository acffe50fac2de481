//! # WealthWatch Core
//!
//! The storage-agnostic core of a family finance tracker: budget statement
//! import with taxonomy reconciliation, expense recording, monthly spending
//! summaries, and shared-expense balance netting.
//!
//! ## Features
//!
//! - **Taxonomy import**: section-structured category sheets reconciled
//!   against a family's existing categories via upserts
//! - **Monthly ledger import**: exported monthly budget sheets turned into
//!   expense rows, with year detection, header location, and an "Imported"
//!   fallback category for unresolvable category text
//! - **Budget tracking**: structured category/sub-category/expense creation
//!   with family-scoped validation, plus monthly spending summaries
//! - **Split calculation**: equal, exact, and percentage split plans for
//!   shared expenses
//! - **Balance netting**: signed net balances between participants computed
//!   from the Expense/Split ledger
//! - **Storage abstraction**: database-agnostic design with trait-based
//!   storage
//!
//! ## Quick Start
//!
//! ```rust
//! use wealthwatch_core::{TaxonomyImporter, utils::MemoryStore};
//!
//! // The importers and tracker work against any BudgetStore implementation;
//! // MemoryStore backs tests and development.
//! let _importer = TaxonomyImporter::new(MemoryStore::new());
//! ```

pub mod import;
pub mod netting;
pub mod tracker;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use import::*;
pub use netting::*;
pub use tracker::*;
pub use traits::*;
pub use types::*;
