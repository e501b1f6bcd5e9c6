//! Ticket purchasing for events.
//!
//! This crate provides:
//! - Purchase validation and the fixed ticket payload layout
//! - QR code rendering behind the `CodeGenerator` trait
//! - The purchase orchestrator, which keeps records and ticket artifacts
//!   consistent and handles order number contention
//! - Admin operations (history, cancellation, ticket verification)
//!
//! A purchase runs these steps:
//! 1. Pick the next order number
//! 2. Ensure the day bucket
//! 3. Encode the payload and render the code
//! 4. Write the artifact
//! 5. Store the record, rolling back the artifact if that fails

pub mod admin;
pub mod codegen;
pub mod error;
pub mod filename;
pub mod lookup;
pub mod orchestrator;
pub mod payload;
pub mod request;

pub use admin::{AdminSecret, AdminService, CancellationConfirmation};
pub use codegen::{CodeGenerator, QrCodeGenerator};
pub use error::{CodeGenError, Result, TicketingError, ValidationError};
pub use filename::{artifact_filename, sanitize_buyer_name};
pub use lookup::TicketLookup;
pub use orchestrator::{OrchestratorConfig, PurchaseConfirmation, PurchaseOrchestrator};
pub use payload::TicketPayload;
pub use request::{PurchaseRequest, ValidPurchase};
