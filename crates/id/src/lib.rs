//! Document identifiers and sharded-path utilities.
//!
//! The catalog stores every document under a sharded directory derived from its identifier.
//!
//! Identifiers use a *canonical* representation: **32 lowercase hexadecimal characters** (no
//! hyphens). This is the same value you get from `Uuid::new_v4().simple().to_string()`.
//!
//! This crate provides:
//! - [`DocumentId`], a wrapper that guarantees the canonical format once constructed.
//! - The sharding logic used to derive a document's directory from its identifier.
//!
//! ## Sharded directory layout
//! For a canonical identifier `u`, a document lives under:
//! `collection_dir/<u[0..2]>/<u[2..4]>/<u>/`
//!
//! Example:
//! `catalog_data/recipes/55/0e/550e8400e29b41d4a716446655440000/`
//!
//! This keeps the fan-out of any single directory small.

mod document_id;

pub use document_id::DocumentId;

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// The input is not a canonical identifier.
    #[error("invalid identifier: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type IdResult<T> = Result<T, IdError>;
