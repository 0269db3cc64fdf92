use splitpot_application::{GroupLedger, LedgerSource, SourceError};
use std::{fs, path::PathBuf};

/// Group snapshot stored as a JSON document with `participants`,
/// `expenses` and `settlements` arrays.
#[derive(Debug, Clone)]
pub struct JsonLedgerFile {
    path: PathBuf,
}

impl JsonLedgerFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LedgerSource for JsonLedgerFile {
    fn load(&self) -> Result<GroupLedger, SourceError> {
        let source = fs::read_to_string(&self.path).map_err(|err| SourceError::Unreadable {
            path: self.path.display().to_string(),
            detail: err.to_string(),
        })?;
        let ledger = parse_ledger(&source)?;
        tracing::debug!(
            path = %self.path.display(),
            member_count = ledger.participants.len(),
            expense_count = ledger.expenses.len(),
            settlement_count = ledger.settlements.len(),
            "Ledger snapshot loaded"
        );
        Ok(ledger)
    }
}

/// Amounts may be JSON numbers or decimal strings.
pub fn parse_ledger(source: &str) -> Result<GroupLedger, SourceError> {
    serde_json::from_str(source).map_err(|err| SourceError::Malformed(err.to_string()))
}
