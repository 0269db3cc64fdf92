#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod ledger_service;
pub mod model;
pub mod ports;

pub use error::{LedgerServiceError, SourceError};
pub use ledger_service::LedgerService;
pub use model::{GroupLedger, LedgerReport};
pub use ports::{LedgerSource, ParticipantDirectory, SettlementOptimizer};
