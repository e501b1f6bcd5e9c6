use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Sequential identifier of a purchase.
///
/// Order numbers start at 1 and are never zero. Wrapping the integer keeps
/// them from being mixed up with quantities or prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct OrderNumber(u64);

impl OrderNumber {
    /// The first order number ever issued.
    pub const FIRST: OrderNumber = OrderNumber(1);

    /// Creates an order number, returning `None` for zero.
    pub fn new(value: u64) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    /// Returns the underlying integer.
    pub fn get(&self) -> u64 {
        self.0
    }

    /// Returns the number that follows this one.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the number as a signed integer for storage backends.
    pub fn as_i64(&self) -> i64 {
        self.0 as i64
    }
}

impl std::fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a string is not a positive order number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOrderNumberError(pub String);

impl std::fmt::Display for ParseOrderNumberError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid order number: {}", self.0)
    }
}

impl std::error::Error for ParseOrderNumberError {}

impl TryFrom<u64> for OrderNumber {
    type Error = ParseOrderNumberError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| ParseOrderNumberError(value.to_string()))
    }
}

impl From<OrderNumber> for u64 {
    fn from(n: OrderNumber) -> Self {
        n.0
    }
}

impl std::str::FromStr for OrderNumber {
    type Err = ParseOrderNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| ParseOrderNumberError(s.to_string()))
    }
}

/// Calendar day used to group ticket artifacts, always in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayBucket(NaiveDate);

impl DayBucket {
    pub const FORMAT: &'static str = "%Y-%m-%d";

    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Returns the bucket for the current UTC day.
    pub fn today() -> Self {
        Self::from(Utc::now())
    }
}

impl From<DateTime<Utc>> for DayBucket {
    fn from(instant: DateTime<Utc>) -> Self {
        Self(instant.date_naive())
    }
}

impl std::fmt::Display for DayBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

/// Error returned when a string is not a `YYYY-MM-DD` day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDayBucketError(pub String);

impl std::fmt::Display for ParseDayBucketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid day bucket: {}", self.0)
    }
}

impl std::error::Error for ParseDayBucketError {}

impl std::str::FromStr for DayBucket {
    type Err = ParseDayBucketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // chrono accepts unpadded fields; buckets must match the directory name exactly.
        if s.len() != 10 {
            return Err(ParseDayBucketError(s.to_string()));
        }
        NaiveDate::parse_from_str(s, Self::FORMAT)
            .map(Self)
            .map_err(|_| ParseDayBucketError(s.to_string()))
    }
}

impl TryFrom<String> for DayBucket {
    type Error = ParseDayBucketError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DayBucket> for String {
    fn from(bucket: DayBucket) -> Self {
        bucket.to_string()
    }
}
