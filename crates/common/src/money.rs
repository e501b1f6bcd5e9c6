use serde::{Deserialize, Serialize};

/// Money amount represented in cents to avoid floating point issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money {
    cents: i64,
}

impl Money {
    /// Creates a new Money amount from cents.
    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Converts a decimal amount (as it arrives in JSON) to cents.
    ///
    /// Rounds to the nearest cent. Returns `None` for NaN, infinities and
    /// values outside the representable range.
    pub fn from_decimal(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }
        let cents = (amount * 100.0).round();
        if cents.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(Self {
            cents: cents as i64,
        })
    }

    /// Parses the `units.cc` form produced by [`Money::to_decimal_string`].
    pub fn parse_decimal(s: &str) -> Option<Self> {
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (units, fraction) = digits.split_once('.')?;
        if units.is_empty()
            || fraction.len() != 2
            || !units.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        let units: i64 = units.parse().ok()?;
        let fraction: i64 = fraction.parse().ok()?;
        let cents = units.checked_mul(100)?.checked_add(fraction)?;
        Some(Self {
            cents: if negative { -cents } else { cents },
        })
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self { cents: 0 }
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns the whole-unit portion.
    pub fn units(&self) -> i64 {
        self.cents / 100
    }

    /// Returns the cents portion (remainder after whole units).
    pub fn cents_part(&self) -> i64 {
        self.cents.abs() % 100
    }

    /// Returns true if the amount is positive.
    pub fn is_positive(&self) -> bool {
        self.cents > 0
    }

    /// Multiplies by a quantity.
    pub fn multiply(&self, quantity: u32) -> Money {
        Money {
            cents: self.cents.saturating_mul(quantity as i64),
        }
    }

    /// Formats as `units.cc` without a currency symbol, e.g. `50.00`.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.cents < 0 { "-" } else { "" };
        format!("{sign}{}.{:02}", self.units().abs(), self.cents_part())
    }

    /// Returns the amount as a float, for JSON responses.
    pub fn as_decimal(&self) -> f64 {
        self.cents as f64 / 100.0
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_cents() {
        let money = Money::from_cents(1234);
        assert_eq!(money.cents(), 1234);
        assert_eq!(money.units(), 12);
        assert_eq!(money.cents_part(), 34);
    }

    #[test]
    fn test_money_from_decimal_rounds_to_cents() {
        assert_eq!(Money::from_decimal(50.0).unwrap().cents(), 5000);
        assert_eq!(Money::from_decimal(19.99).unwrap().cents(), 1999);
        assert_eq!(Money::from_decimal(0.005).unwrap().cents(), 1);
        assert_eq!(Money::from_decimal(0.004).unwrap().cents(), 0);
    }

    #[test]
    fn test_money_from_decimal_rejects_non_finite() {
        assert!(Money::from_decimal(f64::NAN).is_none());
        assert!(Money::from_decimal(f64::INFINITY).is_none());
        assert!(Money::from_decimal(1e300).is_none());
    }

    #[test]
    fn test_money_decimal_string() {
        assert_eq!(Money::from_cents(5000).to_decimal_string(), "50.00");
        assert_eq!(Money::from_cents(5).to_decimal_string(), "0.05");
        assert_eq!(Money::from_cents(-1234).to_decimal_string(), "-12.34");
    }

    #[test]
    fn test_money_parse_decimal() {
        assert_eq!(Money::parse_decimal("50.00"), Some(Money::from_cents(5000)));
        assert_eq!(Money::parse_decimal("0.05"), Some(Money::from_cents(5)));
        assert_eq!(Money::parse_decimal("-1.50"), Some(Money::from_cents(-150)));
        assert_eq!(Money::parse_decimal("50"), None);
        assert_eq!(Money::parse_decimal("50.0"), None);
        assert_eq!(Money::parse_decimal(".50"), None);
        assert_eq!(Money::parse_decimal("5a.00"), None);
    }

    #[test]
    fn test_money_multiply() {
        assert_eq!(Money::from_cents(5000).multiply(2).cents(), 10000);
        assert!(Money::from_cents(1).is_positive());
        assert!(!Money::zero().is_positive());
    }
}
