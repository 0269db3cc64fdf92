#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod model;
pub mod services;

pub use error::{LedgerError, RecordRef};
pub use model::{
    CENT_SCALE, ExpenseRecord, LedgerEntry, Money, NetBalance, Participant, ParticipantId,
    SettlementRecord, SplitRecord, Transfer,
};
pub use services::{
    BalanceAggregator, DEFAULT_EPSILON, DEFAULT_SPLIT_TOLERANCE, SplitAllocator,
    TransferMinimizer, TransferValidator, ValidationFailure, compute_balances,
    minimize_transfers, total_imbalance, total_transfer_amount, validate_transfers,
};
