use std::{cmp::Reverse, collections::BinaryHeap};

use crate::model::{Money, NetBalance, Transfer};

/// Balances within this distance of zero count as settled.
pub const DEFAULT_EPSILON: Money = Money::ONE_CENT;

/// Heap key: outstanding magnitude, then earliest input position.
type Outstanding = (Money, Reverse<usize>);

/// Greedy "min cash flow" settle-up planner.
///
/// The largest creditor is repeatedly paid by the largest debtor until one
/// side runs out. Each step retires at least one participant, so a balanced
/// ledger with `n` non-zero positions needs at most `n - 1` transfers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferMinimizer {
    epsilon: Money,
}

impl Default for TransferMinimizer {
    fn default() -> Self {
        Self::new(DEFAULT_EPSILON)
    }
}

impl TransferMinimizer {
    pub fn new(epsilon: Money) -> Self {
        Self {
            epsilon: epsilon.abs(),
        }
    }

    pub fn epsilon(&self) -> Money {
        self.epsilon
    }

    /// Plans transfers that bring every balance within epsilon of zero.
    ///
    /// Only balances strictly beyond `±epsilon` take part. Equal magnitudes
    /// are served in input order. Emitted amounts are rounded to cents while
    /// the running balances stay exact, so a half-cent input can leave a
    /// participant off by half a cent per transfer it takes part in.
    /// Residuals at or below epsilon are dropped as noise. `balances` is
    /// never modified.
    pub fn minimize(&self, balances: &[NetBalance]) -> Vec<Transfer> {
        let mut creditors: BinaryHeap<Outstanding> = BinaryHeap::new();
        let mut debtors: BinaryHeap<Outstanding> = BinaryHeap::new();
        for (idx, balance) in balances.iter().enumerate() {
            if balance.is_creditor(self.epsilon) {
                creditors.push((balance.net, Reverse(idx)));
            } else if balance.is_debtor(self.epsilon) {
                debtors.push((-balance.net, Reverse(idx)));
            }
        }

        let creditor_count = creditors.len();
        let debtor_count = debtors.len();
        let mut transfers =
            Vec::with_capacity((creditor_count + debtor_count).saturating_sub(1));

        while !creditors.is_empty() && !debtors.is_empty() {
            let (Some((credit, Reverse(creditor))), Some((debt, Reverse(debtor)))) =
                (creditors.pop(), debtors.pop())
            else {
                break;
            };

            // Running balances move by the exact amount; only the emitted
            // transfer is rounded to cents.
            let raw = credit.min(debt);
            let amount = raw.round_to_cents();
            if !amount.is_zero() {
                transfers.push(Transfer {
                    from: balances[debtor].participant.clone(),
                    to: balances[creditor].participant.clone(),
                    amount,
                });
            }

            let credit_left = credit - raw;
            if credit_left > self.epsilon {
                creditors.push((credit_left, Reverse(creditor)));
            }
            let debt_left = debt - raw;
            if debt_left > self.epsilon {
                debtors.push((debt_left, Reverse(debtor)));
            }
        }

        tracing::debug!(
            creditor_count,
            debtor_count,
            transfer_count = transfers.len(),
            epsilon = %self.epsilon,
            "Transfer minimization finished"
        );

        transfers
    }
}

/// Greedy settle-up plan for `balances` with the given tolerance.
pub fn minimize_transfers(balances: &[NetBalance], epsilon: Money) -> Vec<Transfer> {
    TransferMinimizer::new(epsilon).minimize(balances)
}

pub fn total_transfer_amount(transfers: &[Transfer]) -> Money {
    transfers.iter().map(|transfer| transfer.amount).sum()
}
