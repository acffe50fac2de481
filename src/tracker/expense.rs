//! Budget expense recording

use uuid::Uuid;

use crate::traits::*;
use crate::types::*;
use crate::utils::validation::{validate_currency, validate_name, validate_positive_amount};

/// Manager for a family's budget expense ledger
pub struct ExpenseManager<S: BudgetStore> {
    pub(crate) store: S,
}

impl<S: BudgetStore> ExpenseManager<S> {
    /// Create a new expense manager
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record a budget expense through the structured creation path
    ///
    /// The sub-category must belong to the caller's family and to the
    /// stated category; a mismatch is a hard rejection.
    pub async fn create_expense(&mut self, new: NewBudgetExpense) -> FinanceResult<BudgetExpense> {
        validate_name(&new.title)?;
        validate_positive_amount(&new.amount)?;
        validate_currency(&new.currency)?;

        let sub = self
            .store
            .get_sub_category(new.sub_category_id)
            .await?
            .ok_or(FinanceError::SubCategoryNotFound(new.sub_category_id))?;
        if sub.family_id != new.family_id {
            return Err(FinanceError::SubCategoryNotFound(new.sub_category_id));
        }
        if sub.category_id != new.category_id {
            return Err(FinanceError::Validation(
                "Sub-category does not belong to the stated category".to_string(),
            ));
        }

        let expense = BudgetExpense::from_new(new);
        self.store.insert_budget_expense(&expense).await?;
        Ok(expense)
    }

    /// List a family's budget expenses matching the filter
    pub async fn list_expenses(
        &self,
        family_id: Uuid,
        filter: &ExpenseFilter,
    ) -> FinanceResult<Vec<BudgetExpense>> {
        self.store.list_budget_expenses(family_id, filter).await
    }
}
