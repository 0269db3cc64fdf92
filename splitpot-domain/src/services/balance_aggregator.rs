use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::{
    error::{LedgerError, RecordRef},
    model::{
        ExpenseRecord, LedgerEntry, Money, NetBalance, Participant, ParticipantId,
        SettlementRecord, ensure_non_negative,
    },
};

/// Tolerance for split totals drifting from the expense amount before a warning is logged.
pub const DEFAULT_SPLIT_TOLERANCE: Money = Money::ONE_CENT;

const MAX_PERCENTAGE: Decimal = Decimal::ONE_HUNDRED;

#[derive(Clone, Copy, Default)]
struct Tally {
    paid: Money,
    owed: Money,
}

/// Derives per-participant positions from expenses, splits and settlements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BalanceAggregator {
    split_tolerance: Money,
}

impl Default for BalanceAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_SPLIT_TOLERANCE)
    }
}

impl BalanceAggregator {
    pub fn new(split_tolerance: Money) -> Self {
        Self {
            split_tolerance: split_tolerance.abs(),
        }
    }

    pub fn split_tolerance(&self) -> Money {
        self.split_tolerance
    }

    /// One net balance per participant, in participant order.
    pub fn balances(
        &self,
        participants: &[Participant],
        expenses: &[ExpenseRecord],
        settlements: &[SettlementRecord],
    ) -> Result<Vec<NetBalance>, LedgerError> {
        let entries = self.ledger_entries(participants, expenses, settlements)?;
        Ok(entries.into_iter().map(LedgerEntry::into_net_balance).collect())
    }

    /// Paid/owed totals and net position per participant, in participant order.
    ///
    /// A recorded settlement counts as a payment by `from` whose sole
    /// beneficiary is `to`, so it moves both parties toward zero.
    ///
    /// # Errors
    /// Duplicate participants, negative amounts, out-of-range split
    /// percentages and references to participants outside `participants`
    /// are rejected. Split totals that disagree with the expense amount are
    /// logged and aggregated as recorded.
    pub fn ledger_entries(
        &self,
        participants: &[Participant],
        expenses: &[ExpenseRecord],
        settlements: &[SettlementRecord],
    ) -> Result<Vec<LedgerEntry>, LedgerError> {
        let mut tallies: IndexMap<&ParticipantId, Tally> =
            IndexMap::with_capacity(participants.len());
        for participant in participants {
            if tallies.insert(&participant.id, Tally::default()).is_some() {
                return Err(LedgerError::DuplicateParticipant(participant.id.clone()));
            }
        }

        tracing::debug!(
            member_count = participants.len(),
            expense_count = expenses.len(),
            settlement_count = settlements.len(),
            "Ledger aggregation started"
        );

        for (expense_idx, expense) in expenses.iter().enumerate() {
            self.apply_expense(&mut tallies, expense_idx, expense)?;
        }

        for (settlement_idx, settlement) in settlements.iter().enumerate() {
            let at = RecordRef::Settlement(settlement_idx);
            ensure_non_negative(settlement.amount, at)?;
            tally_mut(&mut tallies, &settlement.from, at)?.paid += settlement.amount;
            tally_mut(&mut tallies, &settlement.to, at)?.owed += settlement.amount;
        }

        let entries: Vec<LedgerEntry> = participants
            .iter()
            .zip(tallies.values())
            .map(|(participant, tally)| LedgerEntry {
                participant: participant.clone(),
                total_paid: tally.paid.round_to_cents(),
                total_owed: tally.owed.round_to_cents(),
                net: (tally.paid - tally.owed).round_to_cents(),
            })
            .collect();

        let imbalance: Money = entries.iter().map(|entry| entry.net).sum();
        tracing::debug!(
            member_count = entries.len(),
            imbalance = %imbalance,
            "Ledger aggregation finished"
        );

        Ok(entries)
    }

    fn apply_expense(
        &self,
        tallies: &mut IndexMap<&ParticipantId, Tally>,
        expense_idx: usize,
        expense: &ExpenseRecord,
    ) -> Result<(), LedgerError> {
        let at = RecordRef::Expense(expense_idx);
        ensure_non_negative(expense.amount, at)?;
        tally_mut(tallies, &expense.payer, at)?.paid += expense.amount;

        for (split_idx, split) in expense.splits.iter().enumerate() {
            let at = RecordRef::Split {
                expense: expense_idx,
                split: split_idx,
            };
            ensure_non_negative(split.amount, at)?;
            if let Some(percentage) = split.percentage
                && !(Decimal::ZERO..=MAX_PERCENTAGE).contains(&percentage)
            {
                return Err(LedgerError::InvalidPercentage {
                    participant: split.participant.clone(),
                    percentage,
                });
            }
            tally_mut(tallies, &split.participant, at)?.owed += split.amount;
        }

        let discrepancy = expense.split_discrepancy();
        if !discrepancy.is_within(self.split_tolerance) {
            tracing::warn!(
                expense = expense_idx + 1,
                title = expense.title.as_deref().unwrap_or_default(),
                amount = %expense.amount,
                split_total = %expense.split_total(),
                discrepancy = %discrepancy,
                "Expense splits do not add up to the expense amount"
            );
        }

        Ok(())
    }
}

fn tally_mut<'t>(
    tallies: &'t mut IndexMap<&ParticipantId, Tally>,
    id: &ParticipantId,
    at: RecordRef,
) -> Result<&'t mut Tally, LedgerError> {
    tallies
        .get_mut(id)
        .ok_or_else(|| LedgerError::UnknownParticipant { id: id.clone(), at })
}

/// Net balances with the default split tolerance.
pub fn compute_balances(
    participants: &[Participant],
    expenses: &[ExpenseRecord],
    settlements: &[SettlementRecord],
) -> Result<Vec<NetBalance>, LedgerError> {
    BalanceAggregator::default().balances(participants, expenses, settlements)
}

/// Sum of all nets; non-zero beyond epsilon signals inconsistent input.
pub fn total_imbalance(balances: &[NetBalance]) -> Money {
    balances.iter().map(|balance| balance.net).sum()
}
