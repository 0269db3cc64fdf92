use fxhash::FxHashSet;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    error::{LedgerError, RecordRef},
    model::{CENT_SCALE, Money, ParticipantId, SplitRecord, ensure_non_negative},
};

const CENTS_PER_UNIT: Decimal = Decimal::ONE_HUNDRED;
const FULL_PERCENTAGE: Decimal = Decimal::ONE_HUNDRED;
/// Accepted drift of a percentage total from 100 (e.g. three times 33.33).
const PERCENTAGE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, CENT_SCALE);

/// Builds split records for the equal, percentage and fixed split types.
///
/// Every builder returns splits whose amounts add up to the expense amount
/// rounded to cents.
pub struct SplitAllocator;

impl SplitAllocator {
    /// Equal shares; leftover cents go one each to the first participants.
    pub fn equal(
        amount: Money,
        participants: &[ParticipantId],
    ) -> Result<Vec<SplitRecord>, LedgerError> {
        ensure_non_negative(amount, RecordRef::Draft)?;
        if participants.is_empty() {
            return Err(LedgerError::EmptySplit);
        }
        ensure_distinct(participants.iter())?;

        let total_cents = to_cents(amount);
        let member_count = Decimal::from(participants.len());
        let base = (total_cents / member_count).trunc();
        let remainder = total_cents - base * member_count;

        Ok(participants
            .iter()
            .enumerate()
            .map(|(idx, participant)| {
                let mut share = base;
                if Decimal::from(idx) < remainder {
                    share += Decimal::ONE;
                }
                SplitRecord::new(participant.clone(), cents_to_money(share))
            })
            .collect())
    }

    /// Shares proportional to `percentages`, which must total 100.
    ///
    /// Cents are assigned on cumulative boundaries, so each share is within
    /// one cent of its exact proportion and the last share absorbs the rest.
    pub fn percentage(
        amount: Money,
        percentages: &[(ParticipantId, Decimal)],
    ) -> Result<Vec<SplitRecord>, LedgerError> {
        ensure_non_negative(amount, RecordRef::Draft)?;
        if percentages.is_empty() {
            return Err(LedgerError::EmptySplit);
        }
        ensure_distinct(percentages.iter().map(|(participant, _)| participant))?;
        for (participant, percentage) in percentages {
            if !(Decimal::ZERO..=FULL_PERCENTAGE).contains(percentage) {
                return Err(LedgerError::InvalidPercentage {
                    participant: participant.clone(),
                    percentage: *percentage,
                });
            }
        }
        let percentage_total: Decimal = percentages.iter().map(|(_, pct)| *pct).sum();
        if (percentage_total - FULL_PERCENTAGE).abs() > PERCENTAGE_TOLERANCE {
            return Err(LedgerError::PercentageTotalMismatch {
                total: percentage_total,
            });
        }

        let total_cents = to_cents(amount);
        let mut cumulative = Decimal::ZERO;
        let mut allocated = Decimal::ZERO;
        Ok(percentages
            .iter()
            .map(|(participant, percentage)| {
                cumulative += *percentage;
                let boundary = (total_cents * cumulative / percentage_total).trunc();
                let share = boundary - allocated;
                allocated = boundary;
                SplitRecord::new(participant.clone(), cents_to_money(share))
                    .with_percentage(*percentage)
            })
            .collect())
    }

    /// Caller-chosen amounts, checked against the expense amount.
    pub fn fixed(
        amount: Money,
        shares: &[(ParticipantId, Money)],
        tolerance: Money,
    ) -> Result<Vec<SplitRecord>, LedgerError> {
        ensure_non_negative(amount, RecordRef::Draft)?;
        if shares.is_empty() {
            return Err(LedgerError::EmptySplit);
        }
        ensure_distinct(shares.iter().map(|(participant, _)| participant))?;
        for (_, share) in shares {
            if share.is_negative() {
                return Err(LedgerError::NegativeAmount {
                    at: RecordRef::Draft,
                    amount: *share,
                });
            }
        }

        let actual: Money = shares.iter().map(|(_, share)| *share).sum();
        if !(actual - amount).is_within(tolerance) {
            return Err(LedgerError::SplitSumMismatch {
                expected: amount,
                actual,
            });
        }

        Ok(shares
            .iter()
            .map(|(participant, share)| SplitRecord::new(participant.clone(), *share))
            .collect())
    }
}

fn ensure_distinct<'a>(
    participants: impl Iterator<Item = &'a ParticipantId>,
) -> Result<(), LedgerError> {
    let mut seen: FxHashSet<&ParticipantId> = FxHashSet::default();
    for participant in participants {
        if !seen.insert(participant) {
            return Err(LedgerError::DuplicateParticipant(participant.clone()));
        }
    }
    Ok(())
}

fn to_cents(amount: Money) -> Decimal {
    amount
        .as_decimal()
        .round_dp_with_strategy(CENT_SCALE, RoundingStrategy::MidpointAwayFromZero)
        * CENTS_PER_UNIT
}

fn cents_to_money(cents: Decimal) -> Money {
    Money::from_decimal(cents / CENTS_PER_UNIT)
}
