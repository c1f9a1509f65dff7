//! # API Shared
//!
//! Response types and small services shared by the catalog's HTTP handlers.
//!
//! Contains:
//! - `MessageRes`, the `{"message": ...}` body used for errors, not-found and delete
//!   confirmations
//! - `HealthRes` and `HealthService` for liveness checks

pub mod health;
pub mod message;

pub use health::{HealthRes, HealthService};
pub use message::MessageRes;
