//! # Starsite Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared utilities used by the feature modules:
//!
//! - **`fs`**: file I/O helpers (directory creation, whole-file writes, async
//!   data-source reads).
//! - **`store`**: the key-value store behind conversation and preference
//!   persistence.
//! - **`ui`**: user-visible notices for recoverable failures.
//!

/// Utilities for filesystem operations.
pub mod fs;
/// Key-value persistence (`KeyValueStore`, `FileStore`, `MemoryStore`).
pub mod store;
/// Terminal notices.
pub mod ui;
