//! Main budget tracker orchestrator coordinating taxonomy and expenses

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tracker::{CategoryManager, ExpenseManager};
use crate::traits::*;
use crate::types::*;

/// Budget tracking system orchestrating taxonomy and expense operations
pub struct BudgetTracker<S: BudgetStore> {
    category_manager: CategoryManager<S>,
    expense_manager: ExpenseManager<S>,
}

impl<S: BudgetStore + Clone> BudgetTracker<S> {
    /// Create a new budget tracker with the given storage backend
    pub fn new(store: S) -> Self {
        Self {
            category_manager: CategoryManager::new(store.clone()),
            expense_manager: ExpenseManager::new(store),
        }
    }

    // Taxonomy operations
    /// Create a new category
    pub async fn create_category(
        &mut self,
        family_id: Uuid,
        kind: CategoryKind,
        name: &str,
    ) -> FinanceResult<Category> {
        self.category_manager
            .create_category(family_id, kind, name)
            .await
    }

    /// Create a new sub-category
    pub async fn create_sub_category(
        &mut self,
        family_id: Uuid,
        category_id: Uuid,
        name: &str,
    ) -> FinanceResult<SubCategory> {
        self.category_manager
            .create_sub_category(family_id, category_id, name)
            .await
    }

    /// List a family's categories
    pub async fn list_categories(
        &self,
        family_id: Uuid,
        kind: Option<CategoryKind>,
    ) -> FinanceResult<Vec<Category>> {
        self.category_manager.list_categories(family_id, kind).await
    }

    /// List a family's sub-categories
    pub async fn list_sub_categories(
        &self,
        family_id: Uuid,
        category_id: Option<Uuid>,
    ) -> FinanceResult<Vec<SubCategory>> {
        self.category_manager
            .list_sub_categories(family_id, category_id)
            .await
    }

    // Expense operations
    /// Record a budget expense
    pub async fn create_budget_expense(
        &mut self,
        new: NewBudgetExpense,
    ) -> FinanceResult<BudgetExpense> {
        self.expense_manager.create_expense(new).await
    }

    /// List a family's budget expenses
    pub async fn list_budget_expenses(
        &self,
        family_id: Uuid,
        filter: &ExpenseFilter,
    ) -> FinanceResult<Vec<BudgetExpense>> {
        self.expense_manager.list_expenses(family_id, filter).await
    }

    // Reporting operations
    /// Aggregate a family's spending for one month
    pub async fn monthly_summary(
        &self,
        family_id: Uuid,
        year: i32,
        month: u32,
    ) -> FinanceResult<MonthlySummary> {
        if !(1..=12).contains(&month) {
            return Err(FinanceError::Validation(format!("Invalid month: {month}")));
        }

        let store = &self.expense_manager.store;
        let total_spent = store.sum_expenses(family_id, year, month).await?;
        let by_category = store
            .sum_expenses_by_category(family_id, year, month)
            .await?;
        let by_sub_category = store
            .sum_expenses_by_sub_category(family_id, year, month)
            .await?;

        Ok(MonthlySummary {
            year,
            month,
            total_spent,
            by_category,
            by_sub_category,
            generated_at: chrono::Utc::now().naive_utc(),
        })
    }
}

/// Spending aggregates for one family month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub total_spent: BigDecimal,
    pub by_category: Vec<CategoryTotal>,
    pub by_sub_category: Vec<SubCategoryTotal>,
    pub generated_at: NaiveDateTime,
}
