//! Taxonomy sheet importer
//!
//! Parses category-taxonomy CSV exports structured in labeled sections
//! (`Income Categories`, `Expense Categories...`, `Savings Categories`,
//! terminated by `Yearly Saving Goal`). Column 0 carries category names;
//! within the expense section, column 2 carries sub-category names attached
//! to the most recently seen expense category.

use csv::ReaderBuilder;
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::import::{cell, strip_bom};
use crate::traits::BudgetStore;
use crate::types::*;

/// Section of a taxonomy sheet the scanner is currently inside
///
/// Transitions are triggered only by section-header cells in column 0;
/// rows seen outside any section are counted as skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    None,
    Income,
    Expense,
    Savings,
}

impl Section {
    /// Match a column-0 cell against the known section headers, returning
    /// the section it switches to
    pub fn from_header(cell: &str) -> Option<Section> {
        let lower = cell.to_lowercase();
        if lower == "income categories" {
            Some(Section::Income)
        } else if lower.starts_with("expense categories") {
            Some(Section::Expense)
        } else if lower == "savings categories" {
            Some(Section::Savings)
        } else if lower == "yearly saving goal" {
            Some(Section::None)
        } else {
            None
        }
    }
}

/// Known boilerplate the exporting spreadsheet embeds between sections
fn is_boilerplate(cell: &str) -> bool {
    cell.starts_with("READ THIS FIRST")
        || cell.starts_with("I WILL NO LONGER")
        || cell.starts_with('-')
}

/// Counters reported by a taxonomy import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyImportSummary {
    pub created_categories: usize,
    pub created_sub_categories: usize,
    pub skipped: usize,
}

/// Importer reconciling taxonomy sheets against a family's categories
pub struct TaxonomyImporter<S: BudgetStore> {
    store: S,
}

impl<S: BudgetStore> TaxonomyImporter<S> {
    /// Create a new taxonomy importer over the given store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Import one taxonomy sheet for a family
    ///
    /// Existing categories and sub-categories are reused, so re-importing
    /// the same sheet reports zero creations. Rows with empty names and
    /// content rows outside any section are counted in `skipped`; blank
    /// separator rows and boilerplate are ignored outright.
    pub async fn import(
        &mut self,
        family_id: Uuid,
        csv_text: &str,
    ) -> FinanceResult<TaxonomyImportSummary> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(strip_bom(csv_text).as_bytes());

        let mut section = Section::None;
        let mut current_expense_category: Option<String> = None;
        let mut summary = TaxonomyImportSummary::default();

        for record in reader.records() {
            let record = record?;
            let col0 = cell(&record, 0);
            let col2 = cell(&record, 2);

            if let Some(next) = Section::from_header(col0) {
                section = next;
                current_expense_category = None;
                continue;
            }
            if col0.is_empty() && col2.is_empty() {
                continue;
            }
            if is_boilerplate(col0) {
                continue;
            }

            match section {
                // Income and savings sections share the savings kind.
                Section::Income | Section::Savings => {
                    if col0.is_empty() {
                        summary.skipped += 1;
                        continue;
                    }
                    let up = self
                        .store
                        .upsert_category(family_id, CategoryKind::Savings, col0)
                        .await?;
                    if up.created {
                        summary.created_categories += 1;
                    }
                }
                Section::Expense => {
                    if !col0.is_empty() {
                        current_expense_category = Some(col0.to_string());
                        let up = self
                            .store
                            .upsert_category(family_id, CategoryKind::Expense, col0)
                            .await?;
                        if up.created {
                            summary.created_categories += 1;
                        }
                    }

                    if !col2.is_empty() {
                        let Some(parent_name) = current_expense_category.as_deref() else {
                            summary.skipped += 1;
                            continue;
                        };
                        // The parent may have been named on an earlier row;
                        // upsert again so this row sees its id either way.
                        let parent = self
                            .store
                            .upsert_category(family_id, CategoryKind::Expense, parent_name)
                            .await?;
                        let sub = self
                            .store
                            .upsert_sub_category(family_id, parent.record.id, col2)
                            .await?;
                        if sub.created {
                            summary.created_sub_categories += 1;
                        }
                    }
                }
                Section::None => {
                    summary.skipped += 1;
                }
            }
        }

        debug!(
            "taxonomy import for family {family_id}: {} categories, {} sub-categories, {} skipped",
            summary.created_categories, summary.created_sub_categories, summary.skipped
        );

        Ok(summary)
    }
}
