//! # Starsite Chatbot
//!
//! File: cli/src/chatbot/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! A keyword chatbot: replies come from a response table loaded once at
//! startup, and the conversation is persisted after every message.
//!
//! - `matcher`: `ResponseTable` and `ResponseMatcher` (first-match-wins
//!   keyword search).
//! - `conversation`: `ConversationEntry`, `Conversation` and their storage
//!   format.
//! - `widget`: `ChatWidget`, tying the matcher to a conversation and a store.
//!
//! `load_matcher` is the loading boundary: a table that cannot be loaded is
//! reported with a notice and replaced by an empty one, so the bot still
//! answers with its fallback replies.
//!
use crate::common::ui::{self, Notice};
use std::path::Path;

pub mod conversation;
pub mod matcher;
pub mod widget;

pub use conversation::{Conversation, ConversationEntry, Sender};
pub use matcher::{load_response_table, ResponseMatcher, ResponseTable};
pub use widget::ChatWidget;

/// Loads the response table at `path` into a matcher.
///
/// Failures never propagate: they are shown as a notice and the matcher is
/// configured with an empty table.
pub async fn load_matcher(path: &Path) -> ResponseMatcher {
    let table = match load_response_table(path).await {
        Ok(table) => table,
        Err(e) => {
            ui::notice(&Notice::new(
                "Error de carga",
                format!(
                    "No se pudieron cargar las respuestas del bot. Por favor, revisa el archivo {} ({:#}).",
                    path.display(),
                    e
                ),
            ));
            ResponseTable::new()
        }
    };
    ResponseMatcher::new(table)
}
