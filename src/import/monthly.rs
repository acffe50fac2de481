//! Monthly budget ledger importer
//!
//! Parses exported monthly budget sheets: a preamble carrying the sheet's
//! year somewhere in a header row, then a header row locating the `Date`,
//! `Cost`, `Category`, and optional `Notes` columns, then expense rows until
//! a `Summary`/`Income`/`Savings` terminator. Rows whose category text
//! matches an existing sub-category name reuse that sub-category's parent;
//! everything else lands under the fallback category.

use bigdecimal::BigDecimal;
use chrono::{Datelike, NaiveDate};
use csv::{ReaderBuilder, StringRecord};
use log::{debug, trace};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::OnceLock;
use uuid::Uuid;

use crate::import::{cell, strip_bom};
use crate::traits::BudgetStore;
use crate::types::*;

/// Catch-all expense category for rows whose category text cannot be
/// resolved to an existing sub-category
pub const FALLBACK_CATEGORY: &str = "Imported";

/// Date-column values that end a sheet's expense rows
const TERMINATORS: [&str; 3] = ["summary", "income", "savings"];

fn year_token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(\d{4})\b").expect("year pattern compiles"))
}

/// Counters reported by a monthly ledger import, aggregated across all
/// files in a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyImportSummary {
    pub created_budget_expenses: usize,
    pub skipped: usize,
    pub created_categories: usize,
    pub created_sub_categories: usize,
}

impl MonthlyImportSummary {
    fn merge(&mut self, other: MonthlyImportSummary) {
        self.created_budget_expenses += other.created_budget_expenses;
        self.skipped += other.skipped;
        self.created_categories += other.created_categories;
        self.created_sub_categories += other.created_sub_categories;
    }
}

/// Column indices located from a sheet's header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeaderColumns {
    date: usize,
    cost: usize,
    category: usize,
    notes: Option<usize>,
}

/// Accumulates header-column sightings across preamble rows
///
/// The exporting spreadsheet sometimes splits its header labels over more
/// than one row, so sightings persist until `date`, `cost`, and `category`
/// have all been seen.
#[derive(Debug, Default)]
struct HeaderProbe {
    date: Option<usize>,
    cost: Option<usize>,
    category: Option<usize>,
    notes: Option<usize>,
}

impl HeaderProbe {
    fn observe(&mut self, record: &StringRecord) {
        for (idx, raw) in record.iter().enumerate() {
            match raw.trim().to_lowercase().as_str() {
                "date" => self.date = Some(idx),
                "cost" => self.cost = Some(idx),
                "category" => self.category = Some(idx),
                "notes" => self.notes = Some(idx),
                _ => {}
            }
        }
    }

    fn complete(&self) -> Option<HeaderColumns> {
        Some(HeaderColumns {
            date: self.date?,
            cost: self.cost?,
            category: self.category?,
            notes: self.notes,
        })
    }
}

/// Parse a money cell, stripping `$` and thousands separators
///
/// Returns `None` for unparseable text; sign is preserved so callers can
/// reject non-positive amounts.
pub fn parse_money(raw: &str) -> Option<BigDecimal> {
    let cleaned = raw.replace(['$', ','], "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    BigDecimal::from_str(cleaned).ok()
}

/// Parse a `"<3-letter month> <day>"` cell against the sheet's year
pub fn parse_month_day(raw: &str, year: i32) -> Option<NaiveDate> {
    let mut parts = raw.split_whitespace();
    let month = match parts.next()?.to_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    let day: u32 = parts.next()?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Scan a preamble row for a plausible 4-digit year token
fn detect_year(record: &StringRecord) -> Option<i32> {
    for raw in record.iter() {
        if let Some(caps) = year_token_regex().captures(raw) {
            if let Ok(year) = caps[1].parse::<i32>() {
                if (2000..=2100).contains(&year) {
                    return Some(year);
                }
            }
        }
    }
    None
}

/// Category resolution outcome for one ledger row
struct ResolvedCategory {
    category_id: Uuid,
    sub_category_id: Uuid,
    created_category: bool,
    created_sub_category: bool,
}

/// Importer turning monthly ledger sheets into budget expense rows
pub struct MonthlyImporter<S: BudgetStore> {
    store: S,
}

impl<S: BudgetStore> MonthlyImporter<S> {
    /// Create a new monthly ledger importer over the given store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Import a batch of monthly sheets for a family, aggregating counters
    /// across files
    pub async fn import(
        &mut self,
        family_id: Uuid,
        created_by: Uuid,
        files: &[&str],
    ) -> FinanceResult<MonthlyImportSummary> {
        let mut summary = MonthlyImportSummary::default();
        for csv_text in files {
            summary.merge(self.import_file(family_id, created_by, csv_text).await?);
        }
        debug!(
            "monthly import for family {family_id}: {} expenses, {} skipped, {} categories, {} sub-categories",
            summary.created_budget_expenses,
            summary.skipped,
            summary.created_categories,
            summary.created_sub_categories
        );
        Ok(summary)
    }

    /// Import a single monthly sheet
    ///
    /// A sheet whose header row never yields all of `date`, `cost`, and
    /// `category` produces zero rows without raising an error.
    pub async fn import_file(
        &mut self,
        family_id: Uuid,
        created_by: Uuid,
        csv_text: &str,
    ) -> FinanceResult<MonthlyImportSummary> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(strip_bom(csv_text).as_bytes());

        // Dates in the sheet carry no year; the first plausible 4-digit
        // token in the preamble supplies it, falling back to the current
        // year.
        let fallback_year = chrono::Utc::now().year();
        let mut year: Option<i32> = None;
        let mut probe = HeaderProbe::default();
        let mut columns: Option<HeaderColumns> = None;
        let mut summary = MonthlyImportSummary::default();

        for record in reader.records() {
            let record = record?;

            let Some(cols) = columns else {
                if year.is_none() {
                    year = detect_year(&record);
                    if let Some(detected) = year {
                        trace!("monthly sheet year detected as {detected}");
                    }
                }
                probe.observe(&record);
                columns = probe.complete();
                continue;
            };

            let date_cell = cell(&record, cols.date);
            if date_cell.is_empty() {
                continue;
            }
            if TERMINATORS
                .iter()
                .any(|t| date_cell.eq_ignore_ascii_case(t))
            {
                break;
            }

            let Some(date) = parse_month_day(date_cell, year.unwrap_or(fallback_year)) else {
                summary.skipped += 1;
                continue;
            };

            let Some(amount) = parse_money(cell(&record, cols.cost)) else {
                summary.skipped += 1;
                continue;
            };
            if amount <= BigDecimal::from(0) {
                summary.skipped += 1;
                continue;
            }

            let category_text = cell(&record, cols.category).to_string();
            let Some(resolved) = self.resolve_category(family_id, &category_text).await? else {
                summary.skipped += 1;
                continue;
            };
            if resolved.created_category {
                summary.created_categories += 1;
            }
            if resolved.created_sub_category {
                summary.created_sub_categories += 1;
            }

            let merchant = cols
                .notes
                .map(|idx| cell(&record, idx).to_string())
                .unwrap_or_default();
            let title = if category_text.is_empty() {
                FALLBACK_CATEGORY.to_string()
            } else {
                category_text
            };

            let expense = BudgetExpense::from_new(NewBudgetExpense {
                family_id,
                created_by,
                category_id: resolved.category_id,
                sub_category_id: resolved.sub_category_id,
                title,
                description: String::new(),
                amount,
                currency: "USD".to_string(),
                date,
                merchant,
                notes: String::new(),
            });
            self.store.insert_budget_expense(&expense).await?;
            summary.created_budget_expenses += 1;
        }

        Ok(summary)
    }

    /// Resolve a row's category text to a (category, sub-category) pair
    ///
    /// A sub-category with that exact name anywhere in the family wins and
    /// keeps its parent; otherwise the name becomes a sub-category under the
    /// fallback category. Returns `None` for empty names.
    async fn resolve_category(
        &mut self,
        family_id: Uuid,
        name: &str,
    ) -> FinanceResult<Option<ResolvedCategory>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        if let Some(sub) = self.store.find_sub_category_by_name(family_id, name).await? {
            return Ok(Some(ResolvedCategory {
                category_id: sub.category_id,
                sub_category_id: sub.id,
                created_category: false,
                created_sub_category: false,
            }));
        }

        let fallback = self
            .store
            .upsert_category(family_id, CategoryKind::Expense, FALLBACK_CATEGORY)
            .await?;
        let sub = self
            .store
            .upsert_sub_category(family_id, fallback.record.id, name)
            .await?;
        Ok(Some(ResolvedCategory {
            category_id: fallback.record.id,
            sub_category_id: sub.record.id,
            created_category: fallback.created,
            created_sub_category: sub.created,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_parsing_strips_currency_formatting() {
        assert_eq!(parse_money("$1,200.50"), BigDecimal::from_str("1200.50").ok());
        assert_eq!(parse_money(" 42 "), Some(BigDecimal::from(42)));
        assert_eq!(parse_money("-5"), Some(BigDecimal::from(-5)));
        assert_eq!(parse_money("abc"), None);
        assert_eq!(parse_money(""), None);
        assert_eq!(parse_money("$"), None);
    }

    #[test]
    fn month_day_parsing_uses_detected_year() {
        assert_eq!(
            parse_month_day("Jan 5", 2024),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
        assert_eq!(
            parse_month_day("dec 31", 2025),
            NaiveDate::from_ymd_opt(2025, 12, 31)
        );
        assert_eq!(parse_month_day("Feb 30", 2024), None);
        assert_eq!(parse_month_day("January 5", 2024), None);
        assert_eq!(parse_month_day("Jan", 2024), None);
        assert_eq!(parse_month_day("", 2024), None);
    }

    #[test]
    fn year_detection_requires_plausible_range() {
        let plausible = StringRecord::from(vec!["FinancialDocs-2026 - Jan"]);
        assert_eq!(detect_year(&plausible), Some(2026));

        let out_of_range = StringRecord::from(vec!["sheet 1999", "rev 3000"]);
        assert_eq!(detect_year(&out_of_range), None);

        let no_token = StringRecord::from(vec!["Expenses", ""]);
        assert_eq!(detect_year(&no_token), None);
    }

    #[test]
    fn header_probe_accumulates_across_rows() {
        let mut probe = HeaderProbe::default();
        probe.observe(&StringRecord::from(vec!["", "Date", "Cost"]));
        assert!(probe.complete().is_none());

        probe.observe(&StringRecord::from(vec!["Category", "", "", "Notes"]));
        let cols = probe.complete().unwrap();
        assert_eq!(cols.date, 1);
        assert_eq!(cols.cost, 2);
        assert_eq!(cols.category, 0);
        assert_eq!(cols.notes, Some(3));
    }
}
