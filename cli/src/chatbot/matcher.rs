//! # Starsite Response Matcher
//!
//! File: cli/src/chatbot/matcher.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The `ResponseMatcher` maps free text to a canned reply. The table is an
//! ordered list of (keyword, response) pairs; the first keyword contained in
//! the normalized input wins, not the longest one.
//!
//! ## Response Table Format
//!
//! A JSON object of string values. `welcome` is the greeting and `default`
//! the reply when nothing matches:
//!
//! ```json
//! { "welcome": "¡Bienvenido!", "hola": "¡Hola, viajero!", "default": "No entiendo." }
//! ```
//!
use crate::common::fs::io;
use crate::core::error::{Result, StarsiteError};
use anyhow::anyhow;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

/// Reserved key holding the reply used when no keyword matches.
pub const DEFAULT_KEY: &str = "default";
/// Reserved key holding the greeting for a fresh conversation.
pub const WELCOME_KEY: &str = "welcome";

/// Reply used when the table has no `default` entry.
pub const FALLBACK_RESPONSE: &str = "Lo siento, no entendí tu pregunta.";
/// Greeting used when the table has no `welcome` entry.
pub const FALLBACK_GREETING: &str = "Hola, ¿en qué puedo ayudarte?";

/// Ordered keyword → response mapping.
///
/// Keywords are trimmed and lowercased when inserted. Inserting an existing
/// keyword replaces its response but keeps its original position, the same
/// way a JSON object behaves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseTable {
    entries: Vec<(String, String)>,
}

impl ResponseTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from pairs in insertion order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut table = Self::new();
        for (keyword, response) in pairs {
            table.insert(keyword.as_ref(), response);
        }
        table
    }

    /// Parses a JSON object of string values, keeping document order.
    ///
    /// # Errors
    ///
    /// Returns `StarsiteError::Config` if the document is not a JSON object
    /// or any value is not a string.
    pub fn from_json(document: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(document)
            .map_err(|e| anyhow!(StarsiteError::Config(format!("malformed response table: {}", e))))?;
        let object = match value {
            Value::Object(map) => map,
            other => {
                return Err(anyhow!(StarsiteError::Config(format!(
                    "response table must be a JSON object, found {}",
                    json_kind(&other)
                ))))
            }
        };

        let mut table = Self::new();
        for (keyword, response) in object {
            match response {
                Value::String(text) => table.insert(&keyword, text),
                other => {
                    return Err(anyhow!(StarsiteError::Config(format!(
                        "response for keyword '{}' must be a string, found {}",
                        keyword,
                        json_kind(&other)
                    ))))
                }
            }
        }
        Ok(table)
    }

    /// Adds or replaces `keyword`.
    pub fn insert(&mut self, keyword: &str, response: impl Into<String>) {
        let keyword = normalize(keyword);
        let response = response.into();
        match self.entries.iter_mut().find(|(k, _)| *k == keyword) {
            Some(entry) => entry.1 = response,
            None => self.entries.push((keyword, response)),
        }
    }

    /// Looks up an exact (normalized) keyword.
    pub fn get(&self, keyword: &str) -> Option<&str> {
        let keyword = normalize(keyword);
        self.entries
            .iter()
            .find(|(k, _)| *k == keyword)
            .map(|(_, v)| v.as_str())
    }

    /// Keywords in insertion order.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Reads and parses the response table at `path`.
///
/// # Errors
///
/// `StarsiteError::Load` if the file cannot be read, `StarsiteError::Config`
/// if its content is malformed.
pub async fn load_response_table(path: &Path) -> Result<ResponseTable> {
    let document = io::read_source(path).await?;
    let table = ResponseTable::from_json(&document)?;
    info!("Loaded {} bot responses from {}", table.len(), path.display());
    Ok(table)
}

/// Keyword matcher over a configured `ResponseTable`.
#[derive(Debug, Clone, Default)]
pub struct ResponseMatcher {
    table: ResponseTable,
}

impl ResponseMatcher {
    pub fn new(table: ResponseTable) -> Self {
        Self { table }
    }

    /// Replaces the active table.
    pub fn configure(&mut self, table: ResponseTable) {
        debug!("Configuring matcher with {} keywords", table.len());
        self.table = table;
    }

    pub fn table(&self) -> &ResponseTable {
        &self.table
    }

    /// Replies to `user_text`.
    ///
    /// The input is trimmed and lowercased, then keywords are tried in table
    /// order; the first one contained in the input wins. Empty keywords never
    /// match. Without a match the `default` entry is returned, or
    /// [`FALLBACK_RESPONSE`] if there is none.
    pub fn respond(&self, user_text: &str) -> String {
        let normalized = normalize(user_text);
        self.table
            .entries
            .iter()
            .filter(|(keyword, _)| !keyword.is_empty())
            .find(|(keyword, _)| normalized.contains(keyword.as_str()))
            .map(|(_, response)| response.as_str())
            .or_else(|| self.table.get(DEFAULT_KEY))
            .unwrap_or(FALLBACK_RESPONSE)
            .to_string()
    }

    /// The `welcome` entry, or [`FALLBACK_GREETING`].
    pub fn greeting(&self) -> String {
        self.table
            .get(WELCOME_KEY)
            .unwrap_or(FALLBACK_GREETING)
            .to_string()
    }
}

// ===============================
// 🧪 Inline Unit Tests
// ===============================
