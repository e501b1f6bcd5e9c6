//! Ticketing error types.

use artifact_store::ArtifactStoreError;
use common::OrderNumber;
use order_store::OrderStoreError;
use thiserror::Error;

/// Rejected purchase input or malformed ticket payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Missing { field: &'static str },

    /// A text field contains control characters.
    #[error("{field} must not contain control characters")]
    ControlCharacters { field: &'static str },

    /// A text field is longer than allowed.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// The unit price is not a positive amount.
    #[error("unit_price must be a positive amount")]
    InvalidPrice,

    /// The quantity is below 1 or out of range.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// A scanned payload does not follow the ticket layout.
    #[error("malformed ticket payload: {0}")]
    MalformedPayload(String),
}

/// Failure to render a ticket code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeGenError {
    #[error("payload cannot be encoded: {0}")]
    Encoding(String),
}

/// Errors surfaced by the purchase and admin services.
#[derive(Debug, Error)]
pub enum TicketingError {
    /// Bad or missing input. Nothing was written.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The artifact or record medium cannot be reached or written.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Another purchase took this order number.
    #[error("Duplicate order number: {0}")]
    DuplicateOrder(OrderNumber),

    /// The code generator rejected the payload.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The supplied admin secret is wrong or admin access is disabled.
    #[error("Unauthorized")]
    Unauthorized,

    /// No purchase exists with this order number.
    #[error("Order not found: {0}")]
    NotFound(OrderNumber),

    /// A scanned ticket disagrees with the stored purchase.
    #[error("Ticket does not match order {0}")]
    TicketMismatch(OrderNumber),

    /// A purchase failed after rollback. Wraps the original cause.
    #[error("Purchase failed: {0}")]
    PurchaseFailed(#[source] Box<TicketingError>),
}

impl TicketingError {
    /// Stable name of the error kind, used in API error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            TicketingError::Validation(_) => "ValidationError",
            TicketingError::StorageUnavailable(_) => "StorageUnavailable",
            TicketingError::DuplicateOrder(_) => "DuplicateOrder",
            TicketingError::Encoding(_) => "EncodingError",
            TicketingError::Unauthorized => "Unauthorized",
            TicketingError::NotFound(_) => "NotFound",
            TicketingError::TicketMismatch(_) => "TicketMismatch",
            TicketingError::PurchaseFailed(_) => "PurchaseFailed",
        }
    }

    /// Returns the innermost cause, looking through `PurchaseFailed`.
    pub fn root_cause(&self) -> &TicketingError {
        match self {
            TicketingError::PurchaseFailed(cause) => cause.root_cause(),
            other => other,
        }
    }

    pub(crate) fn purchase_failed(cause: TicketingError) -> Self {
        TicketingError::PurchaseFailed(Box::new(cause))
    }
}

impl From<OrderStoreError> for TicketingError {
    fn from(err: OrderStoreError) -> Self {
        match err {
            OrderStoreError::DuplicateOrder(n) => TicketingError::DuplicateOrder(n),
            other => TicketingError::StorageUnavailable(other.to_string()),
        }
    }
}

impl From<ArtifactStoreError> for TicketingError {
    fn from(err: ArtifactStoreError) -> Self {
        TicketingError::StorageUnavailable(err.to_string())
    }
}

impl From<CodeGenError> for TicketingError {
    fn from(err: CodeGenError) -> Self {
        match err {
            CodeGenError::Encoding(msg) => TicketingError::Encoding(msg),
        }
    }
}

/// Convenience type alias for ticketing results.
pub type Result<T> = std::result::Result<T, TicketingError>;
