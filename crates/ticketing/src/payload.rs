//! Text encoded inside a ticket code.
//!
//! The layout is fixed so that a code can be regenerated from the stored
//! record alone:
//!
//! ```text
//! ORDER:<order number>
//! BUYER:<buyer name>
//! EVENT:<event name>
//! PRICE:<unit price as units.cc>
//! QTY:<quantity>
//! ```

use common::{Money, OrderNumber};
use order_store::PurchaseRecord;

use crate::error::ValidationError;
use crate::request::ValidPurchase;

const SEPARATOR: char = '\n';
const ORDER: &str = "ORDER:";
const BUYER: &str = "BUYER:";
const EVENT: &str = "EVENT:";
const PRICE: &str = "PRICE:";
const QTY: &str = "QTY:";

/// Purchase details carried by a ticket code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketPayload {
    pub order_number: OrderNumber,
    pub buyer_name: String,
    pub event_name: String,
    pub unit_price: Money,
    pub quantity: u32,
}

impl TicketPayload {
    pub fn for_purchase(order_number: OrderNumber, purchase: &ValidPurchase) -> Self {
        Self {
            order_number,
            buyer_name: purchase.buyer_name.clone(),
            event_name: purchase.event_name.clone(),
            unit_price: purchase.unit_price,
            quantity: purchase.quantity,
        }
    }

    pub fn from_record(record: &PurchaseRecord) -> Self {
        Self {
            order_number: record.order_number,
            buyer_name: record.buyer_name.clone(),
            event_name: record.event_name.clone(),
            unit_price: record.unit_price,
            quantity: record.quantity,
        }
    }

    /// Renders the payload text.
    pub fn encode(&self) -> String {
        format!(
            "{ORDER}{}{SEPARATOR}{BUYER}{}{SEPARATOR}{EVENT}{}{SEPARATOR}{PRICE}{}{SEPARATOR}{QTY}{}",
            self.order_number,
            self.buyer_name,
            self.event_name,
            self.unit_price.to_decimal_string(),
            self.quantity,
        )
    }

    /// Parses text produced by [`TicketPayload::encode`].
    pub fn decode(text: &str) -> Result<Self, ValidationError> {
        let lines: Vec<&str> = text.split(SEPARATOR).collect();
        let [order, buyer, event, price, qty] = lines.as_slice() else {
            return Err(malformed(format!("expected 5 fields, found {}", lines.len())));
        };

        let order_number = field(order, ORDER)?
            .parse::<OrderNumber>()
            .map_err(|e| malformed(e.to_string()))?;
        let buyer_name = field(buyer, BUYER)?.to_string();
        let event_name = field(event, EVENT)?.to_string();
        let unit_price = Money::parse_decimal(field(price, PRICE)?)
            .ok_or_else(|| malformed(format!("invalid price: {price}")))?;
        let quantity = field(qty, QTY)?
            .parse::<u32>()
            .map_err(|_| malformed(format!("invalid quantity: {qty}")))?;

        Ok(Self {
            order_number,
            buyer_name,
            event_name,
            unit_price,
            quantity,
        })
    }

    /// Returns true if every field agrees with the stored record.
    pub fn matches(&self, record: &PurchaseRecord) -> bool {
        *self == Self::from_record(record)
    }
}

fn field<'a>(line: &'a str, key: &str) -> Result<&'a str, ValidationError> {
    line.strip_prefix(key)
        .ok_or_else(|| malformed(format!("expected field {key}")))
}

fn malformed(reason: String) -> ValidationError {
    ValidationError::MalformedPayload(reason)
}
