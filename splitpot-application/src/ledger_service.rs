use crate::{
    error::LedgerServiceError,
    model::{GroupLedger, LedgerReport},
    ports::{LedgerSource, SettlementOptimizer},
};
use rust_decimal::Decimal;
use splitpot_domain::{
    BalanceAggregator, DEFAULT_EPSILON, LedgerEntry, Money, NetBalance, TransferValidator,
    total_imbalance,
};

#[derive(Clone, Copy)]
pub struct LedgerService<'a> {
    optimizer: &'a dyn SettlementOptimizer,
    aggregator: BalanceAggregator,
    epsilon: Money,
}

impl<'a> LedgerService<'a> {
    pub fn new(optimizer: &'a dyn SettlementOptimizer) -> Self {
        Self {
            optimizer,
            aggregator: BalanceAggregator::default(),
            epsilon: DEFAULT_EPSILON,
        }
    }

    pub fn with_epsilon(mut self, epsilon: Money) -> Self {
        self.epsilon = epsilon.abs();
        self
    }

    pub fn with_split_tolerance(mut self, split_tolerance: Money) -> Self {
        self.aggregator = BalanceAggregator::new(split_tolerance);
        self
    }

    pub fn epsilon(&self) -> Money {
        self.epsilon
    }

    pub fn load_report(
        &self,
        source: &dyn LedgerSource,
    ) -> Result<LedgerReport, LedgerServiceError> {
        let ledger = source.load()?;
        self.build_report(&ledger)
    }

    /// Aggregates the ledger and proposes the transfers that settle it.
    ///
    /// Transfers are certified against the balances only when the ledger is
    /// balanced; an imbalanced ledger cannot be fully settled and is reported
    /// through [`LedgerReport::imbalance`] instead.
    pub fn build_report(&self, ledger: &GroupLedger) -> Result<LedgerReport, LedgerServiceError> {
        let entries = self.aggregator.ledger_entries(
            &ledger.participants,
            &ledger.expenses,
            &ledger.settlements,
        )?;
        let balances: Vec<NetBalance> = entries.iter().map(LedgerEntry::net_balance).collect();

        let total = total_imbalance(&balances);
        let imbalance = (!total.is_within(self.epsilon)).then_some(total);
        if let Some(imbalance) = imbalance {
            tracing::warn!(
                member_count = balances.len(),
                imbalance = %imbalance,
                "Ledger balances do not sum to zero"
            );
        }

        let transfers = self.optimizer.optimize(&balances, self.epsilon);

        if imbalance.is_none() {
            self.certifier(balances.len())
                .check(&balances, &transfers)
                .map_err(|err| {
                    tracing::error!(
                        transfer_count = transfers.len(),
                        error = %err,
                        "Suggested transfers failed validation"
                    );
                    LedgerServiceError::UnverifiedTransfers(err)
                })?;
        }

        tracing::debug!(
            member_count = balances.len(),
            transfer_count = transfers.len(),
            "Ledger report built"
        );

        Ok(LedgerReport {
            entries,
            balances,
            transfers,
            imbalance,
        })
    }

    /// Anything the minimizer leaves behind (excluded balances and dropped
    /// remainders, at most epsilon each) piles up on the last counterparty,
    /// so the accepted residual grows with the group.
    fn certifier(&self, member_count: usize) -> TransferValidator {
        let excluded = member_count.saturating_sub(1).max(1);
        TransferValidator::new(self.epsilon * Decimal::from(excluded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use rstest::{fixture, rstest};
    use rust_decimal_macros::dec;
    use splitpot_domain::{
        ExpenseRecord, Participant, ParticipantId, SettlementRecord, SplitRecord, Transfer,
        ValidationFailure, minimize_transfers,
    };

    struct DomainOptimizer;

    impl SettlementOptimizer for DomainOptimizer {
        fn optimize(&self, balances: &[NetBalance], epsilon: Money) -> Vec<Transfer> {
            minimize_transfers(balances, epsilon)
        }
    }

    struct NoTransfers;

    impl SettlementOptimizer for NoTransfers {
        fn optimize(&self, _balances: &[NetBalance], _epsilon: Money) -> Vec<Transfer> {
            Vec::new()
        }
    }

    struct FixedSource(GroupLedger);

    impl LedgerSource for FixedSource {
        fn load(&self) -> Result<GroupLedger, SourceError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenSource;

    impl LedgerSource for BrokenSource {
        fn load(&self) -> Result<GroupLedger, SourceError> {
            Err(SourceError::Malformed("expected an object".to_string()))
        }
    }

    fn money(value: Decimal) -> Money {
        Money::from_decimal(value)
    }

    #[fixture]
    fn trip() -> GroupLedger {
        GroupLedger {
            participants: vec![
                Participant::new("a", "Alice"),
                Participant::new("b", "Bob"),
                Participant::new("c", "Charlie"),
            ],
            expenses: vec![
                ExpenseRecord::new(
                    "a",
                    money(dec!(90)),
                    vec![
                        SplitRecord::new("a", money(dec!(30))),
                        SplitRecord::new("b", money(dec!(30))),
                        SplitRecord::new("c", money(dec!(30))),
                    ],
                )
                .with_title("Dinner"),
            ],
            settlements: vec![SettlementRecord::new("b", "a", money(dec!(10)))],
        }
    }

    #[rstest]
    fn balanced_ledger_gets_certified_transfers(trip: GroupLedger) {
        let service = LedgerService::new(&DomainOptimizer);
        let report = service.build_report(&trip).expect("balanced ledger");

        assert_eq!(report.imbalance, None);
        assert_eq!(report.entries.len(), 3);
        let plan: Vec<(&str, &str, Money)> = report
            .transfers
            .iter()
            .map(|t| (t.from.id.as_str(), t.to.id.as_str(), t.amount))
            .collect();
        assert_eq!(
            plan,
            vec![("c", "a", money(dec!(30))), ("b", "a", money(dec!(20)))]
        );
        assert_eq!(report.total_transferred(), money(dec!(50)));
        assert!(!report.is_settled());
    }

    #[rstest]
    fn optimizer_output_is_validated(trip: GroupLedger) {
        let service = LedgerService::new(&NoTransfers);
        let err = service.build_report(&trip).expect_err("nothing transferred");
        assert!(matches!(
            err,
            LedgerServiceError::UnverifiedTransfers(ValidationFailure::Unbalanced { ref participant, .. })
                if participant == &ParticipantId::new("a")
        ));
    }

    #[rstest]
    fn imbalanced_ledger_is_reported_not_rejected(mut trip: GroupLedger) {
        trip.expenses.push(ExpenseRecord::new(
            "c",
            money(dec!(50)),
            vec![SplitRecord::new("b", money(dec!(20)))],
        ));
        let service = LedgerService::new(&NoTransfers);
        let report = service.build_report(&trip).expect("diagnostic only");
        assert_eq!(report.imbalance, Some(money(dec!(30))));
        assert!(report.is_settled());
    }

    #[test]
    fn settled_group_has_no_transfers() {
        let ledger = GroupLedger {
            participants: vec![Participant::new("a", "Alice"), Participant::new("b", "Bob")],
            ..GroupLedger::default()
        };
        let report = LedgerService::new(&DomainOptimizer)
            .build_report(&ledger)
            .expect("empty ledger");
        assert!(report.is_settled());
        assert_eq!(report.imbalance, None);
    }

    #[rstest]
    fn load_report_reads_the_source_first(trip: GroupLedger) {
        let service = LedgerService::new(&DomainOptimizer);
        let expected = service.build_report(&trip).expect("balanced");
        let loaded = service.load_report(&FixedSource(trip)).expect("balanced");
        assert_eq!(loaded, expected);
    }

    #[test]
    fn source_failures_surface_unchanged() {
        let err = LedgerService::new(&DomainOptimizer)
            .load_report(&BrokenSource)
            .expect_err("broken source");
        assert!(matches!(err, LedgerServiceError::Source(SourceError::Malformed(_))));
    }

    #[rstest]
    fn ledger_errors_are_forwarded(mut trip: GroupLedger) {
        trip.settlements.push(SettlementRecord::new("a", "zed", money(dec!(1))));
        let err = LedgerService::new(&DomainOptimizer)
            .build_report(&trip)
            .expect_err("unknown participant");
        assert!(matches!(err, LedgerServiceError::Ledger(_)));
    }

    #[test]
    fn sub_epsilon_leftovers_are_accepted_for_larger_groups() {
        let ledger = GroupLedger {
            participants: ["a", "b", "c", "d"]
                .into_iter()
                .map(|id| Participant::new(id, id.to_uppercase()))
                .collect(),
            expenses: vec![ExpenseRecord::new(
                "a",
                money(dec!(0.03)),
                vec![
                    SplitRecord::new("b", money(dec!(0.01))),
                    SplitRecord::new("c", money(dec!(0.01))),
                    SplitRecord::new("d", money(dec!(0.01))),
                ],
            )],
            settlements: Vec::new(),
        };
        let report = LedgerService::new(&DomainOptimizer)
            .build_report(&ledger)
            .expect("noise stays within the group bound");
        assert!(report.is_settled());
    }

    #[test]
    fn dropped_remainders_pile_up_on_the_last_debtor() {
        let split_three = |payer: &str| {
            ExpenseRecord::new(
                payer,
                money(dec!(0.03)),
                ["c", "d", "e"]
                    .into_iter()
                    .map(|id| SplitRecord::new(id, money(dec!(0.01))))
                    .collect(),
            )
        };
        let ledger = GroupLedger {
            participants: ["a", "b", "c", "d", "e"]
                .into_iter()
                .map(|id| Participant::new(id, id.to_uppercase()))
                .collect(),
            expenses: vec![split_three("a"), split_three("b")],
            settlements: Vec::new(),
        };

        let report = LedgerService::new(&DomainOptimizer)
            .build_report(&ledger)
            .expect("remainders stay within the group bound");

        let plan: Vec<(&str, &str, Money)> = report
            .transfers
            .iter()
            .map(|t| (t.from.id.as_str(), t.to.id.as_str(), t.amount))
            .collect();
        assert_eq!(
            plan,
            vec![("c", "a", money(dec!(0.02))), ("d", "b", money(dec!(0.02)))]
        );
        assert_eq!(
            TransferValidator::new(DEFAULT_EPSILON).check(&report.balances, &report.transfers),
            Err(ValidationFailure::Unbalanced {
                participant: ParticipantId::new("e"),
                residual: money(dec!(-0.02)),
            })
        );
    }

    #[test]
    fn negative_epsilon_is_treated_as_magnitude() {
        let service = LedgerService::new(&DomainOptimizer).with_epsilon(money(dec!(-0.05)));
        assert_eq!(service.epsilon(), money(dec!(0.05)));
    }
}
