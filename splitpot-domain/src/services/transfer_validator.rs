use indexmap::IndexMap;
use thiserror::Error;

use crate::{
    model::{Money, NetBalance, ParticipantId, Transfer},
    services::transfer_minimizer::DEFAULT_EPSILON,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("Transfer #{} has non-positive amount {amount}", .index + 1)]
    NonPositiveAmount { index: usize, amount: Money },
    #[error("Transfer #{} sends money from '{participant}' to itself", .index + 1)]
    SelfTransfer {
        index: usize,
        participant: ParticipantId,
    },
    #[error("'{participant}' is left with {residual} after all transfers")]
    Unbalanced {
        participant: ParticipantId,
        residual: Money,
    },
}

/// Checks that a transfer set settles a list of balances.
///
/// A transfer is applied the way a recorded settlement is aggregated: the
/// sender's balance rises by the amount and the receiver's falls by it.
/// Participants missing from the balances start at zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferValidator {
    epsilon: Money,
}

impl Default for TransferValidator {
    fn default() -> Self {
        Self::new(DEFAULT_EPSILON)
    }
}

impl TransferValidator {
    pub fn new(epsilon: Money) -> Self {
        Self {
            epsilon: epsilon.abs(),
        }
    }

    /// First violation found, in transfer order then balance order.
    pub fn check(
        &self,
        balances: &[NetBalance],
        transfers: &[Transfer],
    ) -> Result<(), ValidationFailure> {
        let mut residuals: IndexMap<&ParticipantId, Money> =
            IndexMap::with_capacity(balances.len());
        for balance in balances {
            *residuals.entry(&balance.participant.id).or_insert(Money::ZERO) += balance.net;
        }

        for (index, transfer) in transfers.iter().enumerate() {
            if !transfer.amount.is_positive() {
                return Err(ValidationFailure::NonPositiveAmount {
                    index,
                    amount: transfer.amount,
                });
            }
            if transfer.from.id == transfer.to.id {
                return Err(ValidationFailure::SelfTransfer {
                    index,
                    participant: transfer.from.id.clone(),
                });
            }
            *residuals.entry(&transfer.from.id).or_insert(Money::ZERO) += transfer.amount;
            *residuals.entry(&transfer.to.id).or_insert(Money::ZERO) -= transfer.amount;
        }

        match residuals
            .into_iter()
            .find(|(_, residual)| !residual.is_within(self.epsilon))
        {
            Some((participant, residual)) => Err(ValidationFailure::Unbalanced {
                participant: participant.clone(),
                residual,
            }),
            None => Ok(()),
        }
    }

    pub fn is_valid(&self, balances: &[NetBalance], transfers: &[Transfer]) -> bool {
        self.check(balances, transfers).is_ok()
    }
}

/// Whether applying `transfers` leaves every balance within `epsilon` of zero.
pub fn validate_transfers(balances: &[NetBalance], transfers: &[Transfer], epsilon: Money) -> bool {
    TransferValidator::new(epsilon).is_valid(balances, transfers)
}
