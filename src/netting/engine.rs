//! Balance netting over the shared-expense ledger

use bigdecimal::BigDecimal;
use log::debug;
use std::collections::HashMap;
use uuid::Uuid;

use crate::traits::SharedLedgerStore;
use crate::types::*;

/// Computes signed balances between participants from the Expense/Split
/// ledger
///
/// Positive always means "owed to the caller". Obligations are netted
/// pairwise only; multi-hop chains (A owes B owes C) are not collapsed, and
/// no currency conversion is applied.
pub struct NettingEngine<S: SharedLedgerStore> {
    store: S,
}

impl<S: SharedLedgerStore> NettingEngine<S> {
    /// Create a new netting engine over the given ledger store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Net balances between the caller and every counterparty sharing an
    /// expense with them
    ///
    /// Counterparties no longer present in the participant table are
    /// dropped from the result. Entries are ordered by display name for
    /// stable output.
    pub async fn balances_for(
        &self,
        participant_id: Uuid,
    ) -> FinanceResult<Vec<ParticipantBalance>> {
        let expenses = self.store.expenses_involving(participant_id).await?;
        debug!(
            "netting {} shared expenses for participant {participant_id}",
            expenses.len()
        );

        let mut net: HashMap<Uuid, BigDecimal> = HashMap::new();
        for expense in &expenses {
            if expense.payer_id == participant_id {
                // Caller paid; every other split-holder owes them.
                for split in &expense.splits {
                    if split.participant_id != participant_id {
                        *net.entry(split.participant_id)
                            .or_insert_with(|| BigDecimal::from(0)) += &split.amount;
                    }
                }
            } else if let Some(split) = expense.split_for(participant_id) {
                *net.entry(expense.payer_id)
                    .or_insert_with(|| BigDecimal::from(0)) -= &split.amount;
            }
        }

        let mut balances = Vec::with_capacity(net.len());
        for (other_id, balance) in net {
            let Some(other) = self.store.get_participant(other_id).await? else {
                continue;
            };
            balances.push(ParticipantBalance {
                participant_id: other_id,
                display_name: other.display_name,
                balance,
            });
        }
        balances.sort_by(|a, b| {
            a.display_name
                .cmp(&b.display_name)
                .then(a.participant_id.cmp(&b.participant_id))
        });

        Ok(balances)
    }

    /// Directional balance between the caller and one specific counterparty
    pub async fn balance_between(
        &self,
        participant_id: Uuid,
        other_id: Uuid,
    ) -> FinanceResult<PairwiseBalance> {
        if participant_id == other_id {
            return Err(FinanceError::Validation(
                "Cannot net a participant against themselves".to_string(),
            ));
        }

        let other = self
            .store
            .get_participant(other_id)
            .await?
            .ok_or(FinanceError::ParticipantNotFound(other_id))?;

        let mut they_owe_you = BigDecimal::from(0);
        let mut you_owe_them = BigDecimal::from(0);

        for expense in self.store.expenses_involving(participant_id).await? {
            if expense.payer_id == participant_id {
                if let Some(split) = expense.split_for(other_id) {
                    they_owe_you += &split.amount;
                }
            } else if expense.payer_id == other_id {
                if let Some(split) = expense.split_for(participant_id) {
                    you_owe_them += &split.amount;
                }
            }
        }

        let net_balance = &they_owe_you - &you_owe_them;
        Ok(PairwiseBalance {
            participant_id: other_id,
            display_name: other.display_name,
            they_owe_you,
            you_owe_them,
            net_balance,
        })
    }
}
