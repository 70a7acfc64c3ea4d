//! Monetary amounts stored as integer cents.
//!
//! Amounts travel over the wire as plain JSON numbers in major units
//! (e.g. `10.99`) but are held and persisted as `i64` cents so that
//! stock-keeping and reporting never accumulate floating point drift.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use validator::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, sqlx::Type)]
#[sqlx(transparent)]
pub struct Money(i64);

impl Money {
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    pub const fn cents(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.0 as f64 / 100.0)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        if !value.is_finite() {
            return Err(serde::de::Error::custom(
                "monetary amount must be a finite number",
            ));
        }
        let cents = (value * 100.0).round();
        if cents < i64::MIN as f64 || cents > i64::MAX as f64 {
            return Err(serde::de::Error::custom("monetary amount out of range"));
        }
        Ok(Money(cents as i64))
    }
}

/// Field validator for amounts that must be strictly positive.
pub fn validate_positive_amount(amount: &Money) -> Result<(), ValidationError> {
    if amount.cents() > 0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("amount");
        err.message = Some("must be greater than zero".into());
        Err(err)
    }
}

/// Field validator for amounts that may be zero but never negative.
pub fn validate_non_negative_amount(amount: &Money) -> Result<(), ValidationError> {
    if amount.cents() >= 0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("amount");
        err.message = Some("must not be negative".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_decimal_numbers_to_cents() {
        let amount: Money = serde_json::from_str("10.99").unwrap();
        assert_eq!(amount.cents(), 1099);

        let amount: Money = serde_json::from_str("30").unwrap();
        assert_eq!(amount.cents(), 3000);
    }

    #[test]
    fn deserialization_rounds_binary_noise() {
        // 19.99 is not exactly representable as f64
        let amount: Money = serde_json::from_str("19.99").unwrap();
        assert_eq!(amount.cents(), 1999);
    }

    #[test]
    fn serializes_cents_as_major_units() {
        assert_eq!(serde_json::to_string(&Money::from_cents(1099)).unwrap(), "10.99");
        assert_eq!(serde_json::to_string(&Money::from_cents(250)).unwrap(), "2.5");
    }

    #[test]
    fn rejects_non_finite_amounts() {
        assert!(serde_json::from_str::<Money>("1e999").is_err());
    }

    #[test]
    fn displays_with_two_decimal_places() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
    }

    #[test]
    fn positive_amount_validator() {
        assert!(validate_positive_amount(&Money::from_cents(1)).is_ok());
        assert!(validate_positive_amount(&Money::from_cents(0)).is_err());
        assert!(validate_positive_amount(&Money::from_cents(-1)).is_err());
    }

    #[test]
    fn non_negative_amount_validator() {
        assert!(validate_non_negative_amount(&Money::from_cents(0)).is_ok());
        assert!(validate_non_negative_amount(&Money::from_cents(-1)).is_err());
    }
}
