use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign},
};

use crate::error::{LedgerError, RecordRef};

/// Number of fractional digits shown and settled (cents).
pub const CENT_SCALE: u32 = 2;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ParticipantId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ParticipantId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: ParticipantId::new(id),
            name: name.into(),
        }
    }
}

/// Exact decimal currency amount.
///
/// Arithmetic never goes through binary floating point. Values keep whatever
/// precision they were built with; [`Money::round_to_cents`] is the single
/// rounding step and is applied at output boundaries only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);
    pub const ONE_CENT: Self = Self(Decimal::from_parts(1, 0, 0, false, CENT_SCALE));

    pub fn new(num: i64, scale: u32) -> Self {
        Self(Decimal::new(num, scale))
    }

    pub fn from_cents(cents: i64) -> Self {
        Self::new(cents, CENT_SCALE)
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Rounds to cents, half away from zero (0.005 -> 0.01, -0.005 -> -0.01).
    pub fn round_to_cents(self) -> Self {
        let rounded = self
            .0
            .round_dp_with_strategy(CENT_SCALE, RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_zero() {
            Self::ZERO
        } else {
            Self(rounded)
        }
    }

    /// Whether `|self| <= tolerance`.
    pub fn is_within(self, tolerance: Money) -> bool {
        self.abs() <= tolerance.abs()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rounded = self.round_to_cents().0;
        rounded.rescale(CENT_SCALE);
        write!(f, "{rounded}")
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Mul<Decimal> for Money {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRecord {
    pub participant: ParticipantId,
    pub amount: Money,
    /// Display-only; `amount` drives the balance math.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<Decimal>,
    /// Never consulted by netting.
    #[serde(default)]
    pub is_paid: bool,
}

impl SplitRecord {
    pub fn new(participant: impl Into<ParticipantId>, amount: Money) -> Self {
        Self {
            participant: participant.into(),
            amount,
            percentage: None,
            is_paid: false,
        }
    }

    pub fn with_percentage(mut self, percentage: Decimal) -> Self {
        self.percentage = Some(percentage);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub payer: ParticipantId,
    pub amount: Money,
    pub splits: Vec<SplitRecord>,
}

impl ExpenseRecord {
    pub fn new(payer: impl Into<ParticipantId>, amount: Money, splits: Vec<SplitRecord>) -> Self {
        Self {
            title: None,
            payer: payer.into(),
            amount,
            splits,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn split_total(&self) -> Money {
        self.splits.iter().map(|split| split.amount).sum()
    }

    /// Split total minus expense amount; zero for a consistent record.
    pub fn split_discrepancy(&self) -> Money {
        self.split_total() - self.amount
    }

    pub fn check_split_sum(&self, tolerance: Money) -> Result<(), LedgerError> {
        if self.split_discrepancy().is_within(tolerance) {
            Ok(())
        } else {
            Err(LedgerError::SplitSumMismatch {
                expected: self.amount,
                actual: self.split_total(),
            })
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRecord {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Money,
}

impl SettlementRecord {
    pub fn new(from: impl Into<ParticipantId>, to: impl Into<ParticipantId>, amount: Money) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }
}

/// Signed position of one participant: positive is owed money, negative owes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetBalance {
    pub participant: Participant,
    pub net: Money,
}

impl NetBalance {
    pub fn new(participant: Participant, net: Money) -> Self {
        Self { participant, net }
    }

    pub fn is_creditor(&self, epsilon: Money) -> bool {
        self.net > epsilon.abs()
    }

    pub fn is_debtor(&self, epsilon: Money) -> bool {
        self.net < -epsilon.abs()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub participant: Participant,
    /// Expenses paid plus settlements sent.
    pub total_paid: Money,
    /// Split shares plus settlements received.
    pub total_owed: Money,
    pub net: Money,
}

impl LedgerEntry {
    pub fn net_balance(&self) -> NetBalance {
        NetBalance::new(self.participant.clone(), self.net)
    }

    pub fn into_net_balance(self) -> NetBalance {
        NetBalance::new(self.participant, self.net)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: Participant,
    pub to: Participant,
    pub amount: Money,
}

pub(crate) fn ensure_non_negative(amount: Money, at: RecordRef) -> Result<(), LedgerError> {
    if amount.is_negative() {
        Err(LedgerError::NegativeAmount { at, amount })
    } else {
        Ok(())
    }
}
