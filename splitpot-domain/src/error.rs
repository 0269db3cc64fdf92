use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

use crate::model::{Money, ParticipantId};

/// Location of a record inside the aggregated input (1-based when displayed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRef {
    Expense(usize),
    Split { expense: usize, split: usize },
    Settlement(usize),
    /// An expense still being drafted by the split allocator.
    Draft,
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordRef::Expense(idx) => write!(f, "expense #{}", idx + 1),
            RecordRef::Split { expense, split } => {
                write!(f, "split #{} of expense #{}", split + 1, expense + 1)
            }
            RecordRef::Settlement(idx) => write!(f, "settlement #{}", idx + 1),
            RecordRef::Draft => f.write_str("expense draft"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Participant '{0}' is listed more than once")]
    DuplicateParticipant(ParticipantId),
    #[error("Unknown participant '{id}' referenced by {at}")]
    UnknownParticipant { id: ParticipantId, at: RecordRef },
    #[error("Negative amount {amount} in {at}")]
    NegativeAmount { at: RecordRef, amount: Money },
    #[error("Percentage {percentage} for '{participant}' is outside 0..=100")]
    InvalidPercentage {
        participant: ParticipantId,
        percentage: Decimal,
    },
    #[error("Percentages must add up to 100 (found {total})")]
    PercentageTotalMismatch { total: Decimal },
    #[error("Splits add up to {actual} but the expense amount is {expected}")]
    SplitSumMismatch { expected: Money, actual: Money },
    #[error("An expense must be split between at least one participant")]
    EmptySplit,
}
