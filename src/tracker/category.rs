//! Category and sub-category management

use uuid::Uuid;

use crate::traits::*;
use crate::types::*;
use crate::utils::validation::validate_name;

/// Manager for a family's category taxonomy
pub struct CategoryManager<S: BudgetStore> {
    pub(crate) store: S,
}

impl<S: BudgetStore> CategoryManager<S> {
    /// Create a new category manager
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create a new category
    ///
    /// Rejects duplicates of an existing (family, kind, name) key.
    pub async fn create_category(
        &mut self,
        family_id: Uuid,
        kind: CategoryKind,
        name: &str,
    ) -> FinanceResult<Category> {
        validate_name(name)?;

        let up = self.store.upsert_category(family_id, kind, name).await?;
        if !up.created {
            return Err(FinanceError::Validation(format!(
                "Category '{name}' already exists"
            )));
        }
        Ok(up.record)
    }

    /// Create a new sub-category under an existing category
    ///
    /// The parent category must belong to the same family.
    pub async fn create_sub_category(
        &mut self,
        family_id: Uuid,
        category_id: Uuid,
        name: &str,
    ) -> FinanceResult<SubCategory> {
        validate_name(name)?;

        let parent = self
            .store
            .get_category(category_id)
            .await?
            .ok_or(FinanceError::CategoryNotFound(category_id))?;
        if parent.family_id != family_id {
            return Err(FinanceError::CategoryNotFound(category_id));
        }

        let up = self
            .store
            .upsert_sub_category(family_id, category_id, name)
            .await?;
        if !up.created {
            return Err(FinanceError::Validation(format!(
                "Sub-category '{name}' already exists under '{}'",
                parent.name
            )));
        }
        Ok(up.record)
    }

    /// Get a category by ID
    pub async fn get_category(&self, category_id: Uuid) -> FinanceResult<Option<Category>> {
        self.store.get_category(category_id).await
    }

    /// List a family's categories, optionally filtered by kind
    pub async fn list_categories(
        &self,
        family_id: Uuid,
        kind: Option<CategoryKind>,
    ) -> FinanceResult<Vec<Category>> {
        self.store.list_categories(family_id, kind).await
    }

    /// List a family's sub-categories, optionally filtered by parent
    pub async fn list_sub_categories(
        &self,
        family_id: Uuid,
        category_id: Option<Uuid>,
    ) -> FinanceResult<Vec<SubCategory>> {
        self.store.list_sub_categories(family_id, category_id).await
    }
}
