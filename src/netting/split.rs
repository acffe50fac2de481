//! Split calculation for shared expenses

use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::types::*;

/// How a shared expense is divided among participants
#[derive(Debug, Clone, PartialEq)]
pub enum SplitPlan {
    /// Everyone owes the same share
    Equal { participant_ids: Vec<Uuid> },
    /// Exact amounts per participant; must sum to the expense total
    Exact { shares: Vec<(Uuid, BigDecimal)> },
    /// Percentages per participant; must sum to 100
    Percentage { shares: Vec<(Uuid, BigDecimal)> },
}

/// Calculate the splits for a shared expense total according to a plan
pub fn calculate_splits(total: &BigDecimal, plan: &SplitPlan) -> FinanceResult<Vec<Split>> {
    if *total <= BigDecimal::from(0) {
        return Err(FinanceError::Validation(
            "Expense amount must be positive".to_string(),
        ));
    }

    match plan {
        SplitPlan::Equal { participant_ids } => equal_split(total, participant_ids),
        SplitPlan::Exact { shares } => exact_split(total, shares),
        SplitPlan::Percentage { shares } => percentage_split(total, shares),
    }
}

fn equal_split(total: &BigDecimal, participant_ids: &[Uuid]) -> FinanceResult<Vec<Split>> {
    if participant_ids.is_empty() {
        return Err(FinanceError::Validation(
            "At least one participant is required".to_string(),
        ));
    }

    let share = total / BigDecimal::from(participant_ids.len() as u64);
    Ok(participant_ids
        .iter()
        .map(|&participant_id| Split {
            participant_id,
            amount: share.clone(),
            percentage: None,
        })
        .collect())
}

fn exact_split(total: &BigDecimal, shares: &[(Uuid, BigDecimal)]) -> FinanceResult<Vec<Split>> {
    let mut splits = Vec::with_capacity(shares.len());
    let mut sum = BigDecimal::from(0);

    for (participant_id, amount) in shares {
        if *amount <= BigDecimal::from(0) {
            return Err(FinanceError::Validation(
                "Split amount must be greater than 0".to_string(),
            ));
        }
        sum += amount;
        splits.push(Split {
            participant_id: *participant_id,
            amount: amount.clone(),
            percentage: None,
        });
    }

    if sum != *total {
        return Err(FinanceError::Validation(format!(
            "Split amounts must sum to the expense total: {sum} != {total}"
        )));
    }

    Ok(splits)
}

fn percentage_split(total: &BigDecimal, shares: &[(Uuid, BigDecimal)]) -> FinanceResult<Vec<Split>> {
    let mut splits = Vec::with_capacity(shares.len());
    let mut sum = BigDecimal::from(0);

    for (participant_id, percentage) in shares {
        if *percentage <= BigDecimal::from(0) {
            return Err(FinanceError::Validation(
                "Percentage must be greater than 0".to_string(),
            ));
        }
        sum += percentage;

        let amount = percentage / BigDecimal::from(100) * total;
        splits.push(Split {
            participant_id: *participant_id,
            amount,
            percentage: Some(percentage.clone()),
        });
    }

    if sum != BigDecimal::from(100) {
        return Err(FinanceError::Validation(format!(
            "Percentages must sum to 100, got {sum}"
        )));
    }

    Ok(splits)
}
