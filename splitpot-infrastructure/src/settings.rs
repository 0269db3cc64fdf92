use rust_decimal::Decimal;
use splitpot_domain::{DEFAULT_EPSILON, DEFAULT_SPLIT_TOLERANCE, Money};
use std::{env, str::FromStr};
use thiserror::Error;

pub const EPSILON_KEY: &str = "SPLITPOT_EPSILON";
pub const SPLIT_TOLERANCE_KEY: &str = "SPLITPOT_SPLIT_TOLERANCE";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("{key} must be a decimal number (got '{value}')")]
    InvalidDecimal { key: &'static str, value: String },
    #[error("{key} must not be negative")]
    Negative { key: &'static str },
}

/// Tunables for ledger computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Balances within this distance of zero count as settled.
    pub epsilon: Money,
    /// Split totals may drift this far from the expense amount before a warning.
    pub split_tolerance: Money,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            split_tolerance: DEFAULT_SPLIT_TOLERANCE,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            epsilon: read_amount(&lookup, EPSILON_KEY)?.unwrap_or(defaults.epsilon),
            split_tolerance: read_amount(&lookup, SPLIT_TOLERANCE_KEY)?
                .unwrap_or(defaults.split_tolerance),
        })
    }
}

fn read_amount<F>(lookup: &F, key: &'static str) -> Result<Option<Money>, SettingsError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value = Decimal::from_str(trimmed).map_err(|_| SettingsError::InvalidDecimal {
        key,
        value: raw.clone(),
    })?;
    if value < Decimal::ZERO {
        return Err(SettingsError::Negative { key });
    }
    Ok(Some(Money::from_decimal(value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let settings = Settings::from_lookup(lookup_from(&[])).expect("defaults");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.epsilon, Money::ONE_CENT);
    }

    #[test]
    fn reads_both_keys() {
        let settings = Settings::from_lookup(lookup_from(&[
            (EPSILON_KEY, "0.05"),
            (SPLIT_TOLERANCE_KEY, " 0.1 "),
        ]))
        .expect("valid settings");
        assert_eq!(settings.epsilon, Money::from_decimal(dec!(0.05)));
        assert_eq!(settings.split_tolerance, Money::from_decimal(dec!(0.1)));
    }

    #[test]
    fn blank_value_falls_back_to_default() {
        let settings =
            Settings::from_lookup(lookup_from(&[(EPSILON_KEY, "  ")])).expect("blank is unset");
        assert_eq!(settings.epsilon, DEFAULT_EPSILON);
    }

    #[rstest]
    #[case::not_a_number(
        EPSILON_KEY,
        "cent",
        SettingsError::InvalidDecimal { key: EPSILON_KEY, value: "cent".to_string() }
    )]
    #[case::negative(
        SPLIT_TOLERANCE_KEY,
        "-0.01",
        SettingsError::Negative { key: SPLIT_TOLERANCE_KEY }
    )]
    fn rejects_bad_values(
        #[case] key: &str,
        #[case] value: &str,
        #[case] expected: SettingsError,
    ) {
        assert_eq!(Settings::from_lookup(lookup_from(&[(key, value)])), Err(expected));
    }

    #[test]
    fn zero_epsilon_is_allowed() {
        let settings =
            Settings::from_lookup(lookup_from(&[(EPSILON_KEY, "0")])).expect("zero is valid");
        assert!(settings.epsilon.is_zero());
    }
}
