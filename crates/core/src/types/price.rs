//! Non-negative money amounts backed by decimal arithmetic.
//!
//! The catalog backend has been observed to ship prices as JSON numbers in
//! some payloads and as strings in others, so deserialization is lenient:
//! anything that does not parse as a number becomes zero rather than a hard
//! failure.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// A non-negative monetary amount.
///
/// Negative inputs clamp to zero; a `Price` can never go below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Default)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price, clamping negative amounts to zero.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        if amount.is_sign_negative() {
            Self(Decimal::ZERO)
        } else {
            Self(amount)
        }
    }

    /// Coerce a JSON value (number or numeric string) into a price.
    ///
    /// Unparsable or missing values become zero.
    #[must_use]
    pub fn coerce(value: &serde_json::Value) -> Self {
        let parsed = match value {
            serde_json::Value::Number(n) => n.as_f64().and_then(Decimal::from_f64_retain),
            serde_json::Value::String(s) => s.trim().parse::<Decimal>().ok(),
            _ => None,
        };
        Self::new(parsed.unwrap_or(Decimal::ZERO))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::coerce(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    #[test]
    fn test_coerce_number() {
        let price = Price::coerce(&serde_json::json!(10.5));
        assert_eq!(price.amount(), dec("10.5"));
    }

    #[test]
    fn test_coerce_string() {
        let price = Price::coerce(&serde_json::json!("10.5"));
        assert_eq!(price.amount(), dec("10.5"));
    }

    #[test]
    fn test_coerce_garbage_defaults_to_zero() {
        assert_eq!(Price::coerce(&serde_json::json!("abc")), Price::ZERO);
        assert_eq!(Price::coerce(&serde_json::Value::Null), Price::ZERO);
        assert_eq!(Price::coerce(&serde_json::json!({"a": 1})), Price::ZERO);
    }

    #[test]
    fn test_negative_clamps_to_zero() {
        assert_eq!(Price::new(dec("-3")), Price::ZERO);
        assert_eq!(Price::coerce(&serde_json::json!(-3)), Price::ZERO);
    }

    #[test]
    fn test_deserialize_is_lenient() {
        let from_number: Price = serde_json::from_str("12").expect("number");
        let from_string: Price = serde_json::from_str("\"12\"").expect("string");
        assert_eq!(from_number, from_string);
    }

    #[test]
    fn test_display_two_places() {
        assert_eq!(Price::new(dec("7")).to_string(), "7.00");
    }
}
