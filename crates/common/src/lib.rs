//! Shared identifiers and value types for the ticketing service.

pub mod money;
pub mod types;

pub use money::Money;
pub use types::{DayBucket, OrderNumber, ParseDayBucketError, ParseOrderNumberError};
