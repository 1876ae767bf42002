//! # Starsite Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module defines the error types shared by the Starsite library and CLI.
//! It follows a two-level approach:
//! - `StarsiteError`: a `thiserror` enum naming the failures callers may want
//!   to match on (load failures, validation rejections, missing routes).
//! - `Result<T>`: an alias for `anyhow::Result<T>` so that any layer can add
//!   context with `.with_context(...)` while the typed error stays reachable
//!   through `downcast_ref`.
//!
//! ## Examples
//!
//! ```rust,ignore
//! // Reject user input before anything is persisted.
//! if distance <= 0.0 {
//!     anyhow::bail!(StarsiteError::Validation("distance must be positive".into()));
//! }
//!
//! // Distinguish validation failures at the HTTP boundary.
//! match result {
//!     Err(e) if e.downcast_ref::<StarsiteError>().is_some_and(StarsiteError::is_validation) => { /* 422 */ }
//!     _ => {}
//! }
//! ```
//!
use thiserror::Error;

/// Custom error type for Starsite.
#[derive(Error, Debug)]
pub enum StarsiteError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// A data source (responses, planets) could not be fetched or parsed.
    #[error("Load error: {0}")]
    Load(String),

    /// User-entered values outside the accepted domain.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No route registered for '{key}' and no default route available.")]
    RouteNotFound { key: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Template rendering error: {source}")]
    Template {
        #[from]
        source: tera::Error,
    },

    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl StarsiteError {
    /// True for `Validation` errors.
    pub fn is_validation(&self) -> bool {
        matches!(self, StarsiteError::Validation(_))
    }
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
