//! Purchase input and its validation.

use common::Money;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Longest accepted buyer or event name, in characters.
pub const MAX_NAME_CHARS: usize = 100;

/// Raw purchase input as it arrives from a client.
///
/// Every field is optional here so that missing fields are reported as
/// validation errors instead of deserialization failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub buyer_name: Option<String>,
    pub event_name: Option<String>,
    pub unit_price: Option<f64>,
    pub quantity: Option<i64>,
}

impl PurchaseRequest {
    /// Creates a request with every field present.
    pub fn new(
        buyer_name: impl Into<String>,
        event_name: impl Into<String>,
        unit_price: f64,
        quantity: i64,
    ) -> Self {
        Self {
            buyer_name: Some(buyer_name.into()),
            event_name: Some(event_name.into()),
            unit_price: Some(unit_price),
            quantity: Some(quantity),
        }
    }

    /// Checks every field and returns the normalized purchase.
    pub fn validate(&self) -> Result<ValidPurchase, ValidationError> {
        let buyer_name = validate_name("buyer_name", self.buyer_name.as_deref())?;
        let event_name = validate_name("event_name", self.event_name.as_deref())?;

        let unit_price = self
            .unit_price
            .ok_or(ValidationError::Missing {
                field: "unit_price",
            })
            .and_then(|p| Money::from_decimal(p).ok_or(ValidationError::InvalidPrice))?;
        if !unit_price.is_positive() {
            return Err(ValidationError::InvalidPrice);
        }

        let quantity = self
            .quantity
            .ok_or(ValidationError::Missing { field: "quantity" })?;
        let quantity = u32::try_from(quantity)
            .ok()
            .filter(|q| *q >= 1)
            .ok_or(ValidationError::InvalidQuantity)?;

        Ok(ValidPurchase {
            buyer_name,
            event_name,
            unit_price,
            quantity,
        })
    }
}

fn validate_name(field: &'static str, value: Option<&str>) -> Result<String, ValidationError> {
    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(ValidationError::Missing { field });
    }
    if trimmed.chars().any(char::is_control) {
        return Err(ValidationError::ControlCharacters { field });
    }
    if trimmed.chars().count() > MAX_NAME_CHARS {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_NAME_CHARS,
        });
    }
    Ok(trimmed.to_string())
}

/// A purchase that passed validation. Names are trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPurchase {
    pub buyer_name: String,
    pub event_name: String,
    pub unit_price: Money,
    pub quantity: u32,
}
