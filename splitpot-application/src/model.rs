use serde::{Deserialize, Serialize};
use splitpot_domain::{
    ExpenseRecord, LedgerEntry, Money, NetBalance, Participant, SettlementRecord, Transfer,
};

/// Everything recorded for one group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupLedger {
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub expenses: Vec<ExpenseRecord>,
    #[serde(default)]
    pub settlements: Vec<SettlementRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerReport {
    pub entries: Vec<LedgerEntry>,
    pub balances: Vec<NetBalance>,
    pub transfers: Vec<Transfer>,
    /// Sum of all nets when it exceeds epsilon; the input lost money somewhere.
    pub imbalance: Option<Money>,
}

impl LedgerReport {
    pub fn is_settled(&self) -> bool {
        self.transfers.is_empty()
    }

    pub fn total_transferred(&self) -> Money {
        splitpot_domain::total_transfer_amount(&self.transfers)
    }
}
