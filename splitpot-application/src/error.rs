use splitpot_domain::{LedgerError, ValidationFailure};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read ledger from '{path}': {detail}")]
    Unreadable { path: String, detail: String },
    #[error("Malformed ledger snapshot: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum LedgerServiceError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("Suggested transfers do not settle the ledger: {0}")]
    UnverifiedTransfers(ValidationFailure),
}
