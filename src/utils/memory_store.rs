//! In-memory storage implementation for testing

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::Datelike;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::traits::*;
use crate::types::*;

/// In-memory storage implementation for testing and development
///
/// Upserts hold the write lock across the existence check and the insert,
/// so concurrent importers cannot create duplicate taxonomy rows.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    categories: Arc<RwLock<HashMap<Uuid, Category>>>,
    sub_categories: Arc<RwLock<HashMap<Uuid, SubCategory>>>,
    budget_expenses: Arc<RwLock<HashMap<Uuid, BudgetExpense>>>,
    shared_expenses: Arc<RwLock<HashMap<Uuid, SharedExpense>>>,
    participants: Arc<RwLock<HashMap<Uuid, Participant>>>,
}

impl MemoryStore {
    /// Create a new memory store instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.categories.write().unwrap().clear();
        self.sub_categories.write().unwrap().clear();
        self.budget_expenses.write().unwrap().clear();
        self.shared_expenses.write().unwrap().clear();
        self.participants.write().unwrap().clear();
    }

    /// Seed a participant, returning its id
    pub fn insert_participant(&self, participant: Participant) -> Uuid {
        let id = participant.id;
        self.participants.write().unwrap().insert(id, participant);
        id
    }

    /// Seed a shared expense with its splits, returning its id
    pub fn insert_shared_expense(&self, expense: SharedExpense) -> Uuid {
        let id = expense.id;
        self.shared_expenses.write().unwrap().insert(id, expense);
        id
    }

    fn kind_rank(kind: CategoryKind) -> u8 {
        match kind {
            CategoryKind::Expense => 0,
            CategoryKind::Savings => 1,
        }
    }
}

#[async_trait]
impl BudgetStore for MemoryStore {
    async fn upsert_category(
        &mut self,
        family_id: Uuid,
        kind: CategoryKind,
        name: &str,
    ) -> FinanceResult<Upserted<Category>> {
        let mut categories = self.categories.write().unwrap();
        if let Some(existing) = categories
            .values()
            .find(|c| c.family_id == family_id && c.kind == kind && c.name == name)
        {
            return Ok(Upserted {
                record: existing.clone(),
                created: false,
            });
        }

        let category = Category::new(family_id, kind, name);
        categories.insert(category.id, category.clone());
        Ok(Upserted {
            record: category,
            created: true,
        })
    }

    async fn upsert_sub_category(
        &mut self,
        family_id: Uuid,
        category_id: Uuid,
        name: &str,
    ) -> FinanceResult<Upserted<SubCategory>> {
        let mut sub_categories = self.sub_categories.write().unwrap();
        if let Some(existing) = sub_categories.values().find(|s| {
            s.family_id == family_id && s.category_id == category_id && s.name == name
        }) {
            return Ok(Upserted {
                record: existing.clone(),
                created: false,
            });
        }

        let sub = SubCategory::new(family_id, category_id, name);
        sub_categories.insert(sub.id, sub.clone());
        Ok(Upserted {
            record: sub,
            created: true,
        })
    }

    async fn get_category(&self, category_id: Uuid) -> FinanceResult<Option<Category>> {
        Ok(self.categories.read().unwrap().get(&category_id).cloned())
    }

    async fn get_sub_category(&self, sub_category_id: Uuid) -> FinanceResult<Option<SubCategory>> {
        Ok(self
            .sub_categories
            .read()
            .unwrap()
            .get(&sub_category_id)
            .cloned())
    }

    async fn find_sub_category_by_name(
        &self,
        family_id: Uuid,
        name: &str,
    ) -> FinanceResult<Option<SubCategory>> {
        let sub_categories = self.sub_categories.read().unwrap();
        // Oldest row wins when the name repeats under different parents.
        Ok(sub_categories
            .values()
            .filter(|s| s.family_id == family_id && s.name == name)
            .min_by_key(|s| (s.created_at, s.id))
            .cloned())
    }

    async fn list_categories(
        &self,
        family_id: Uuid,
        kind: Option<CategoryKind>,
    ) -> FinanceResult<Vec<Category>> {
        let categories = self.categories.read().unwrap();
        let mut filtered: Vec<Category> = categories
            .values()
            .filter(|c| c.family_id == family_id && kind.is_none_or(|k| c.kind == k))
            .cloned()
            .collect();
        filtered.sort_by(|a, b| {
            Self::kind_rank(a.kind)
                .cmp(&Self::kind_rank(b.kind))
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(filtered)
    }

    async fn list_sub_categories(
        &self,
        family_id: Uuid,
        category_id: Option<Uuid>,
    ) -> FinanceResult<Vec<SubCategory>> {
        let sub_categories = self.sub_categories.read().unwrap();
        let mut filtered: Vec<SubCategory> = sub_categories
            .values()
            .filter(|s| {
                s.family_id == family_id && category_id.is_none_or(|c| s.category_id == c)
            })
            .cloned()
            .collect();
        filtered.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(filtered)
    }

    async fn insert_budget_expense(&mut self, expense: &BudgetExpense) -> FinanceResult<()> {
        self.budget_expenses
            .write()
            .unwrap()
            .insert(expense.id, expense.clone());
        Ok(())
    }

    async fn list_budget_expenses(
        &self,
        family_id: Uuid,
        filter: &ExpenseFilter,
    ) -> FinanceResult<Vec<BudgetExpense>> {
        let expenses = self.budget_expenses.read().unwrap();
        let mut filtered: Vec<BudgetExpense> = expenses
            .values()
            .filter(|e| {
                e.family_id == family_id
                    && filter.year.is_none_or(|y| e.date.year() == y)
                    && filter.month.is_none_or(|m| e.date.month() == m)
                    && filter.category_id.is_none_or(|c| e.category_id == c)
                    && filter.sub_category_id.is_none_or(|s| e.sub_category_id == s)
            })
            .cloned()
            .collect();
        filtered.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(filtered)
    }

    async fn sum_expenses(
        &self,
        family_id: Uuid,
        year: i32,
        month: u32,
    ) -> FinanceResult<BigDecimal> {
        let expenses = self.budget_expenses.read().unwrap();
        Ok(expenses
            .values()
            .filter(|e| {
                e.family_id == family_id && e.date.year() == year && e.date.month() == month
            })
            .map(|e| &e.amount)
            .sum())
    }

    async fn sum_expenses_by_category(
        &self,
        family_id: Uuid,
        year: i32,
        month: u32,
    ) -> FinanceResult<Vec<CategoryTotal>> {
        let mut grouped: HashMap<Uuid, BigDecimal> = HashMap::new();
        {
            let expenses = self.budget_expenses.read().unwrap();
            for expense in expenses.values().filter(|e| {
                e.family_id == family_id && e.date.year() == year && e.date.month() == month
            }) {
                *grouped
                    .entry(expense.category_id)
                    .or_insert_with(|| BigDecimal::from(0)) += &expense.amount;
            }
        }

        let categories = self.categories.read().unwrap();
        let mut totals: Vec<CategoryTotal> = grouped
            .into_iter()
            .filter_map(|(category_id, total_amount)| {
                categories.get(&category_id).map(|c| CategoryTotal {
                    category_id,
                    category_name: c.name.clone(),
                    total_amount,
                })
            })
            .collect();
        totals.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));
        Ok(totals)
    }

    async fn sum_expenses_by_sub_category(
        &self,
        family_id: Uuid,
        year: i32,
        month: u32,
    ) -> FinanceResult<Vec<SubCategoryTotal>> {
        let mut grouped: HashMap<Uuid, BigDecimal> = HashMap::new();
        {
            let expenses = self.budget_expenses.read().unwrap();
            for expense in expenses.values().filter(|e| {
                e.family_id == family_id && e.date.year() == year && e.date.month() == month
            }) {
                *grouped
                    .entry(expense.sub_category_id)
                    .or_insert_with(|| BigDecimal::from(0)) += &expense.amount;
            }
        }

        let sub_categories = self.sub_categories.read().unwrap();
        let mut totals: Vec<SubCategoryTotal> = grouped
            .into_iter()
            .filter_map(|(sub_category_id, total_amount)| {
                sub_categories.get(&sub_category_id).map(|s| SubCategoryTotal {
                    category_id: s.category_id,
                    sub_category_id,
                    sub_category_name: s.name.clone(),
                    total_amount,
                })
            })
            .collect();
        totals.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));
        Ok(totals)
    }
}

#[async_trait]
impl SharedLedgerStore for MemoryStore {
    async fn expenses_involving(
        &self,
        participant_id: Uuid,
    ) -> FinanceResult<Vec<SharedExpense>> {
        let expenses = self.shared_expenses.read().unwrap();
        let mut involved: Vec<SharedExpense> = expenses
            .values()
            .filter(|e| {
                e.payer_id == participant_id
                    || e.splits.iter().any(|s| s.participant_id == participant_id)
            })
            .cloned()
            .collect();
        involved.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        Ok(involved)
    }

    async fn get_participant(&self, participant_id: Uuid) -> FinanceResult<Option<Participant>> {
        Ok(self
            .participants
            .read()
            .unwrap()
            .get(&participant_id)
            .cloned())
    }
}
