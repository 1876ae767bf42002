//! # Starsite Library
//!
//! File: cli/src/lib.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The reusable pieces behind the `starsite` binary:
//!
//! - `router`: hash-fragment `ViewRouter` with render/attach lifecycle hooks
//! - `chatbot`: keyword `ResponseMatcher`, persisted `Conversation`, `ChatWidget`
//! - `simulator`: planet list and travel-time calculation
//! - `button`: the talking button and its press counter
//! - `site`: the starfield site's route table and shared `SiteContext`
//! - `core`: configuration, errors and templating
//! - `common`: filesystem helpers, key-value store, notices
//!
//! The library is also what the integration tests in `cli/tests/` import.
//!
pub mod button;
pub mod chatbot;
pub mod common;
pub mod core;
pub mod router;
pub mod simulator;
pub mod site;
