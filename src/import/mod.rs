//! Statement importers for uploaded CSV exports
//!
//! Two layouts are supported: taxonomy sheets listing income/expense/savings
//! categories ([`taxonomy`]) and monthly budget ledgers ([`monthly`]). Both
//! importers reconcile against the existing taxonomy through upserts and
//! report counters instead of failing on malformed rows. A whole import is
//! expected to run inside one storage transaction; any storage error aborts
//! it with nothing committed.

pub mod monthly;
pub mod taxonomy;

pub use monthly::*;
pub use taxonomy::*;

/// Get a trimmed cell from a record, treating missing columns as empty
pub(crate) fn cell(record: &csv::StringRecord, idx: usize) -> &str {
    record.get(idx).map(str::trim).unwrap_or("")
}

/// Strip a UTF-8 byte-order mark if the upload carries one
pub(crate) fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}
