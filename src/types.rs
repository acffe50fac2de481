//! Core types and data structures for the budget tracking system

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kinds of budgeting categories
///
/// Income sections of imported taxonomy sheets collapse onto `Savings`;
/// there is no separate income kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    /// Spending categories (Housing, Groceries, ...)
    Expense,
    /// Savings and income categories
    Savings,
}

/// Top-level budgeting category, scoped to one family
///
/// Unique per (family, kind, name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier for the category
    pub id: Uuid,
    /// Owning family
    pub family_id: Uuid,
    /// Kind of category (expense or savings)
    pub kind: CategoryKind,
    /// Human-readable category name
    pub name: String,
    /// Optional free-text description
    pub description: String,
    /// Whether the category is available for new expenses
    pub is_active: bool,
    /// When the category was created
    pub created_at: NaiveDateTime,
    /// When the category was last updated
    pub updated_at: NaiveDateTime,
}

impl Category {
    /// Create a new active category
    pub fn new(family_id: Uuid, kind: CategoryKind, name: impl Into<String>) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4(),
            family_id,
            kind,
            name: name.into(),
            description: String::new(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Sub-category attached to a parent category
///
/// Unique per (family, category, name). The parent category must belong to
/// the same family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubCategory {
    /// Unique identifier for the sub-category
    pub id: Uuid,
    /// Owning family
    pub family_id: Uuid,
    /// Parent category
    pub category_id: Uuid,
    /// Human-readable sub-category name
    pub name: String,
    /// Optional free-text description
    pub description: String,
    /// Whether the sub-category is available for new expenses
    pub is_active: bool,
    /// When the sub-category was created
    pub created_at: NaiveDateTime,
    /// When the sub-category was last updated
    pub updated_at: NaiveDateTime,
}

impl SubCategory {
    /// Create a new active sub-category
    pub fn new(family_id: Uuid, category_id: Uuid, name: impl Into<String>) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: Uuid::new_v4(),
            family_id,
            category_id,
            name: name.into(),
            description: String::new(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Parameters for creating a budget expense row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBudgetExpense {
    pub family_id: Uuid,
    pub created_by: Uuid,
    pub category_id: Uuid,
    pub sub_category_id: Uuid,
    pub title: String,
    pub description: String,
    pub amount: BigDecimal,
    /// ISO currency code; defaults to USD when empty
    pub currency: String,
    pub date: NaiveDate,
    pub merchant: String,
    pub notes: String,
}

/// Budget ledger row, produced by import or structured creation
///
/// Invariant: the sub-category belongs to the stated category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetExpense {
    /// Unique identifier for the expense
    pub id: Uuid,
    /// Owning family
    pub family_id: Uuid,
    /// Participant who recorded the expense
    pub created_by: Uuid,
    /// Category the expense is filed under
    pub category_id: Uuid,
    /// Sub-category the expense is filed under
    pub sub_category_id: Uuid,
    /// Short title (for imported rows, the raw category text)
    pub title: String,
    /// Optional free-text description
    pub description: String,
    /// Positive amount spent
    pub amount: BigDecimal,
    /// ISO currency code
    pub currency: String,
    /// Date the expense occurred
    pub date: NaiveDate,
    /// Merchant or payee
    pub merchant: String,
    /// Free-form notes
    pub notes: String,
    /// When the expense row was created
    pub created_at: NaiveDateTime,
    /// When the expense row was last updated
    pub updated_at: NaiveDateTime,
}

impl BudgetExpense {
    /// Materialize a new expense row from creation parameters
    pub fn from_new(new: NewBudgetExpense) -> Self {
        let now = chrono::Utc::now().naive_utc();
        let currency = if new.currency.trim().is_empty() {
            "USD".to_string()
        } else {
            new.currency
        };
        Self {
            id: Uuid::new_v4(),
            family_id: new.family_id,
            created_by: new.created_by,
            category_id: new.category_id,
            sub_category_id: new.sub_category_id,
            title: new.title,
            description: new.description,
            amount: new.amount,
            currency,
            date: new.date,
            merchant: new.merchant,
            notes: new.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A named participant's owed portion of a shared expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    /// Participant who owes this portion
    pub participant_id: Uuid,
    /// Amount owed to the payer
    pub amount: BigDecimal,
    /// Share as a percentage of the total, when split by percentage
    pub percentage: Option<BigDecimal>,
}

/// An expense shared among participants, paid by one of them
///
/// Split amounts are independent values; stored rows are not required to
/// have splits summing to `amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedExpense {
    /// Unique identifier for the shared expense
    pub id: Uuid,
    /// Short title
    pub title: String,
    /// Total amount paid by the payer
    pub amount: BigDecimal,
    /// ISO currency code
    pub currency: String,
    /// Date the expense occurred
    pub date: NaiveDate,
    /// Participant who paid
    pub payer_id: Uuid,
    /// Optional group the expense belongs to
    pub group_id: Option<Uuid>,
    /// Per-participant owed portions
    pub splits: Vec<Split>,
    /// When the expense was created
    pub created_at: NaiveDateTime,
}

impl SharedExpense {
    /// Find the split held by a specific participant, if any
    pub fn split_for(&self, participant_id: Uuid) -> Option<&Split> {
        self.splits
            .iter()
            .find(|s| s.participant_id == participant_id)
    }

    /// Sum of all split amounts on this expense
    pub fn total_split_amount(&self) -> BigDecimal {
        self.splits.iter().map(|s| &s.amount).sum()
    }
}

/// A participant in shared expenses (a user, from the netting engine's view)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Unique identifier for the participant
    pub id: Uuid,
    /// Name shown in balance listings
    pub display_name: String,
    /// Contact email
    pub email: String,
}

/// Signed net balance against one counterparty
///
/// Positive means the counterparty owes the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantBalance {
    pub participant_id: Uuid,
    pub display_name: String,
    pub balance: BigDecimal,
}

/// Directional balance breakdown between two participants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseBalance {
    /// The counterparty
    pub participant_id: Uuid,
    pub display_name: String,
    /// Splits the counterparty holds on expenses the caller paid
    pub they_owe_you: BigDecimal,
    /// Splits the caller holds on expenses the counterparty paid
    pub you_owe_them: BigDecimal,
    /// `they_owe_you - you_owe_them`
    pub net_balance: BigDecimal,
}

/// Errors that can occur in the finance core
#[derive(Debug, thiserror::Error)]
pub enum FinanceError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("CSV error: {0}")]
    Csv(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),
    #[error("Sub-category not found: {0}")]
    SubCategoryNotFound(Uuid),
    #[error("Participant not found: {0}")]
    ParticipantNotFound(Uuid),
}

impl From<csv::Error> for FinanceError {
    fn from(err: csv::Error) -> Self {
        FinanceError::Csv(err.to_string())
    }
}

/// Result type for finance core operations
pub type FinanceResult<T> = Result<T, FinanceError>;
