//! # kubeprov-events
//!
//! Lifecycle event envelope and desired cluster configuration for the
//! managed cluster resource handler.
//!
//! ## Design Principles
//!
//! - Desired configuration is immutable once it enters an operation
//! - The envelope is the orchestrator's wire format; unknown keys are ignored
//! - The physical resource ID is assigned once, on create, and never changes
//!
//! ## Event Envelope
//!
//! Every activation receives one envelope with:
//! - The request type (`Create`, `Update`, `Delete`)
//! - A unique request ID (used to derive deterministic cluster names)
//! - The physical resource ID (absent on create)
//! - New and, on update, old resource properties
//!
//! ## Responses
//!
//! - `OnEventResponse` for the mutating entry point
//! - `IsCompleteResponse` for the polling entry point

mod envelope;
mod error;
mod types;

pub use envelope::*;
pub use error::EventError;
pub use types::*;
