//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::*;

/// Outcome of an upsert: the stored record plus whether it was newly created
#[derive(Debug, Clone, PartialEq)]
pub struct Upserted<T> {
    pub record: T,
    pub created: bool,
}

/// Filter for listing budget expenses
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub category_id: Option<Uuid>,
    pub sub_category_id: Option<Uuid>,
}

/// Grouped spending total for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category_id: Uuid,
    pub category_name: String,
    pub total_amount: BigDecimal,
}

/// Grouped spending total for one sub-category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubCategoryTotal {
    pub category_id: Uuid,
    pub sub_category_id: Uuid,
    pub sub_category_name: String,
    pub total_amount: BigDecimal,
}

/// Storage abstraction for the budget taxonomy and expense ledger
///
/// This trait allows the finance core to work with any relational backend
/// (PostgreSQL, MySQL, SQLite, in-memory, etc.) by implementing these
/// methods. The upsert methods are single conditional-insert-or-fetch
/// operations: implementations must resolve the check-then-insert race
/// themselves (unique-constraint-backed insert, or a lock held across the
/// check and the insert). Callers wrap a whole import in one backend
/// transaction, so a failed import leaves no partial taxonomy or ledger
/// state.
#[async_trait]
pub trait BudgetStore: Send + Sync {
    /// Fetch the category with the given (family, kind, name) key, creating
    /// it when absent
    async fn upsert_category(
        &mut self,
        family_id: Uuid,
        kind: CategoryKind,
        name: &str,
    ) -> FinanceResult<Upserted<Category>>;

    /// Fetch the sub-category with the given (family, category, name) key,
    /// creating it when absent
    async fn upsert_sub_category(
        &mut self,
        family_id: Uuid,
        category_id: Uuid,
        name: &str,
    ) -> FinanceResult<Upserted<SubCategory>>;

    /// Get a category by ID
    async fn get_category(&self, category_id: Uuid) -> FinanceResult<Option<Category>>;

    /// Get a sub-category by ID
    async fn get_sub_category(&self, sub_category_id: Uuid) -> FinanceResult<Option<SubCategory>>;

    /// Find a sub-category by name anywhere in the family, regardless of
    /// parent category
    async fn find_sub_category_by_name(
        &self,
        family_id: Uuid,
        name: &str,
    ) -> FinanceResult<Option<SubCategory>>;

    /// List a family's categories, optionally filtered by kind
    async fn list_categories(
        &self,
        family_id: Uuid,
        kind: Option<CategoryKind>,
    ) -> FinanceResult<Vec<Category>>;

    /// List a family's sub-categories, optionally filtered by parent category
    async fn list_sub_categories(
        &self,
        family_id: Uuid,
        category_id: Option<Uuid>,
    ) -> FinanceResult<Vec<SubCategory>>;

    /// Append a budget expense row
    async fn insert_budget_expense(&mut self, expense: &BudgetExpense) -> FinanceResult<()>;

    /// List a family's budget expenses matching the filter
    async fn list_budget_expenses(
        &self,
        family_id: Uuid,
        filter: &ExpenseFilter,
    ) -> FinanceResult<Vec<BudgetExpense>>;

    /// Total spent by the family in a month
    async fn sum_expenses(
        &self,
        family_id: Uuid,
        year: i32,
        month: u32,
    ) -> FinanceResult<BigDecimal>;

    /// Monthly spending grouped by category, largest first
    async fn sum_expenses_by_category(
        &self,
        family_id: Uuid,
        year: i32,
        month: u32,
    ) -> FinanceResult<Vec<CategoryTotal>>;

    /// Monthly spending grouped by sub-category, largest first
    async fn sum_expenses_by_sub_category(
        &self,
        family_id: Uuid,
        year: i32,
        month: u32,
    ) -> FinanceResult<Vec<SubCategoryTotal>>;
}

/// Read-only view of the shared-expense ledger consumed by the netting
/// engine
#[async_trait]
pub trait SharedLedgerStore: Send + Sync {
    /// All shared expenses where the participant is the payer or holds a
    /// split, with splits populated
    async fn expenses_involving(
        &self,
        participant_id: Uuid,
    ) -> FinanceResult<Vec<SharedExpense>>;

    /// Get a participant by ID
    async fn get_participant(&self, participant_id: Uuid) -> FinanceResult<Option<Participant>>;
}
