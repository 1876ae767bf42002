//! # Starsite Conversation History
//!
//! File: cli/src/chatbot/conversation.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The whole conversation is stored as one JSON array under
//! [`CONVERSATION_KEY`] and rewritten after every appended message.
//!
use crate::common::store::KeyValueStore;
use crate::core::error::{Result, StarsiteError};
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store key holding the serialized conversation.
pub const CONVERSATION_KEY: &str = "chatbotConversation";

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

/// One displayed message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub text: String,
    pub sender: Sender,
}

impl ConversationEntry {
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            text: text.into(),
            sender,
        }
    }
}

/// Ordered message history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    entries: Vec<ConversationEntry>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ConversationEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reads the conversation from `store`. A missing key is an empty conversation.
    ///
    /// # Errors
    ///
    /// `StarsiteError::Storage` if the stored value is not a valid conversation.
    pub fn load(store: &impl KeyValueStore) -> Result<Self> {
        match store.get(CONVERSATION_KEY) {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                anyhow!(StarsiteError::Storage(format!(
                    "stored conversation is malformed: {}",
                    e
                )))
            }),
            None => Ok(Self::new()),
        }
    }

    /// Serializes the full conversation into `store`.
    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<()> {
        let raw = serde_json::to_string(self)?;
        store.set(CONVERSATION_KEY, &raw)
    }
}
