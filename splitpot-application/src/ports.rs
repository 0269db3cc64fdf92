use crate::{error::SourceError, model::GroupLedger};
use splitpot_domain::{Money, NetBalance, ParticipantId, Transfer};
use std::collections::HashMap;

/// Persistence collaborator that hands over a full group snapshot.
pub trait LedgerSource: Send + Sync {
    fn load(&self) -> Result<GroupLedger, SourceError>;
}

pub trait SettlementOptimizer: Send + Sync {
    fn optimize(&self, balances: &[NetBalance], epsilon: Money) -> Vec<Transfer>;
}

pub trait ParticipantDirectory: Send + Sync {
    fn display_name(&self, id: &ParticipantId) -> Option<&str>;
}

impl ParticipantDirectory for HashMap<ParticipantId, String> {
    fn display_name(&self, id: &ParticipantId) -> Option<&str> {
        self.get(id).map(String::as_str)
    }
}

impl ParticipantDirectory for GroupLedger {
    fn display_name(&self, id: &ParticipantId) -> Option<&str> {
        self.participants
            .iter()
            .find(|participant| &participant.id == id)
            .map(|participant| participant.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitpot_domain::Participant;

    #[test]
    fn group_ledger_resolves_names_by_id() {
        let ledger = GroupLedger {
            participants: vec![Participant::new("1", "Alice"), Participant::new("2", "Bob")],
            ..GroupLedger::default()
        };
        let directory: &dyn ParticipantDirectory = &ledger;
        assert_eq!(directory.display_name(&ParticipantId::new("2")), Some("Bob"));
        assert_eq!(directory.display_name(&ParticipantId::new("3")), None);
    }
}
