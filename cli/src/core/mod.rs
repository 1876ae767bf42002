//! # Starsite Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module aggregates the infrastructure shared by every feature:
//! - `config`: configuration loading, merging and validation
//! - `error`: the `StarsiteError` type and the `Result` alias
//! - `templating`: Tera view rendering for the site routes
//!
//! ```rust,ignore
//! use starsite::core::config; // For loading configuration
//! use starsite::core::error::{StarsiteError, Result}; // For error handling
//! use starsite::core::templating::Views; // For rendering route content
//! ```
//!
pub mod config;
pub mod error;
pub mod templating;
