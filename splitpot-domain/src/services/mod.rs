pub mod balance_aggregator;
pub mod split_allocator;
pub mod transfer_minimizer;
pub mod transfer_validator;

pub use balance_aggregator::{
    BalanceAggregator, DEFAULT_SPLIT_TOLERANCE, compute_balances, total_imbalance,
};
pub use split_allocator::SplitAllocator;
pub use transfer_minimizer::{
    DEFAULT_EPSILON, TransferMinimizer, minimize_transfers, total_transfer_amount,
};
pub use transfer_validator::{TransferValidator, ValidationFailure, validate_transfers};
