use splitpot_application::SettlementOptimizer;
use splitpot_domain::{Money, NetBalance, Transfer, TransferMinimizer};

#[derive(Default)]
pub struct GreedySettlementOptimizer;

impl SettlementOptimizer for GreedySettlementOptimizer {
    fn optimize(&self, balances: &[NetBalance], epsilon: Money) -> Vec<Transfer> {
        TransferMinimizer::new(epsilon).minimize(balances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use splitpot_domain::{DEFAULT_EPSILON, Participant};

    fn balance(id: &str, cents: i64) -> NetBalance {
        NetBalance::new(Participant::new(id, id.to_uppercase()), Money::from_cents(cents))
    }

    #[rstest]
    #[case::default_epsilon(DEFAULT_EPSILON, 1)]
    #[case::wide_epsilon(Money::new(1, 0), 0)]
    fn optimize_honours_the_requested_epsilon(#[case] epsilon: Money, #[case] expected: usize) {
        let balances = [balance("a", 50), balance("b", -50)];
        let transfers = GreedySettlementOptimizer.optimize(&balances, epsilon);
        assert_eq!(transfers.len(), expected);
    }

    #[test]
    fn optimize_pays_the_creditor() {
        let balances = [balance("a", 10_000), balance("b", -10_000), balance("c", 0)];
        let transfers = GreedySettlementOptimizer.optimize(&balances, DEFAULT_EPSILON);
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].from.id.as_str(), "b");
        assert_eq!(transfers[0].to.id.as_str(), "a");
        assert_eq!(transfers[0].amount, Money::new(100, 0));
    }
}
