//! # Starsite Chat Widget
//!
//! File: cli/src/chatbot/widget.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! A matcher, a conversation and the store it persists to. The widget owns
//! no presentation: callers render the entries it returns and decide when
//! to show a bot reply (the CLI waits for the typing delay first).
//!
//! A message only joins the in-memory conversation once the store has
//! accepted the rewritten history.
//!
use super::conversation::{Conversation, ConversationEntry, Sender};
use super::matcher::ResponseMatcher;
use crate::common::store::KeyValueStore;
use crate::core::error::Result;
use tracing::{debug, warn};

pub struct ChatWidget<S: KeyValueStore> {
    matcher: ResponseMatcher,
    conversation: Conversation,
    store: S,
}

impl<S: KeyValueStore> ChatWidget<S> {
    pub fn new(matcher: ResponseMatcher, store: S) -> Self {
        Self {
            matcher,
            conversation: Conversation::new(),
            store,
        }
    }

    /// Restores the saved conversation, or greets when there is none.
    ///
    /// A malformed saved conversation is logged and replaced.
    pub fn start(&mut self) -> Result<&[ConversationEntry]> {
        self.conversation = Conversation::load(&self.store).unwrap_or_else(|e| {
            warn!("Discarding saved conversation: {:#}", e);
            Conversation::new()
        });
        if self.conversation.is_empty() {
            let greeting = self.matcher.greeting();
            self.display(&greeting, Sender::Bot)?;
        } else {
            debug!("Restored {} messages", self.conversation.len());
        }
        Ok(self.conversation.entries())
    }

    /// Handles a submitted message.
    ///
    /// Blank input is ignored (`Ok(None)`). Otherwise the user's message is
    /// displayed and the bot's reply is returned for delayed display.
    pub fn submit(&mut self, text: &str) -> Result<Option<String>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        self.display(text, Sender::User)?;
        Ok(Some(self.matcher.respond(text)))
    }

    /// Appends a message and persists the whole conversation.
    ///
    /// The message is kept only if it was saved.
    pub fn display(&mut self, text: &str, sender: Sender) -> Result<()> {
        let mut next = self.conversation.clone();
        next.push(ConversationEntry::new(text, sender));
        next.save(&mut self.store)?;
        self.conversation = next;
        Ok(())
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn matcher(&self) -> &ResponseMatcher {
        &self.matcher
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chatbot::conversation::CONVERSATION_KEY;
    use crate::chatbot::matcher::ResponseTable;
    use crate::common::store::MemoryStore;
    use anyhow::bail;

    /// Reads like an empty store; every write fails.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            bail!("read-only store")
        }

        fn remove(&mut self, _key: &str) -> Result<()> {
            bail!("read-only store")
        }
    }

    fn widget(store: MemoryStore) -> ChatWidget<MemoryStore> {
        let table = ResponseTable::from_pairs([
            ("precio", "Cuesta $10"),
            ("default", "No entendí"),
            ("welcome", "Hola"),
        ]);
        ChatWidget::new(ResponseMatcher::new(table), store)
    }

    #[test]
    fn test_fresh_start_greets_and_persists() -> Result<()> {
        let mut chat = widget(MemoryStore::new());
        let entries = chat.start()?.to_vec();
        assert_eq!(entries, vec![ConversationEntry::new("Hola", Sender::Bot)]);
        assert_eq!(chat.store().writes(), 1);
        Ok(())
    }

    #[test]
    fn test_restart_restores_without_greeting_again() -> Result<()> {
        let mut chat = widget(MemoryStore::new());
        chat.start()?;
        let reply = chat.submit("¿precio?")?.expect("reply");
        chat.display(&reply, Sender::Bot)?;

        let mut restarted = widget(chat.store().clone());
        let entries = restarted.start()?;
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1], ConversationEntry::new("¿precio?", Sender::User));
        assert_eq!(entries[2], ConversationEntry::new("Cuesta $10", Sender::Bot));
        Ok(())
    }

    #[test]
    fn test_blank_submit_is_ignored() -> Result<()> {
        let mut chat = widget(MemoryStore::new());
        chat.start()?;
        assert_eq!(chat.submit("   ")?, None);
        assert_eq!(chat.conversation().len(), 1);
        Ok(())
    }

    #[test]
    fn test_submit_persists_user_message_before_reply() -> Result<()> {
        let mut chat = widget(MemoryStore::new());
        chat.start()?;
        let reply = chat.submit("  xyz ")?;
        assert_eq!(reply.as_deref(), Some("No entendí"));
        let saved = Conversation::load(chat.store())?;
        assert_eq!(
            saved.entries().last(),
            Some(&ConversationEntry::new("xyz", Sender::User))
        );
        Ok(())
    }

    #[test]
    fn test_malformed_saved_conversation_starts_over() -> Result<()> {
        let mut store = MemoryStore::new();
        store.set(CONVERSATION_KEY, "not json")?;
        let mut chat = widget(store);
        let entries = chat.start()?;
        assert_eq!(entries, &[ConversationEntry::new("Hola", Sender::Bot)]);
        Ok(())
    }

    #[test]
    fn test_unsaved_message_is_not_kept() {
        let table = ResponseTable::from_pairs([("welcome", "Hola")]);
        let mut chat = ChatWidget::new(ResponseMatcher::new(table), ReadOnlyStore);

        assert!(chat.start().is_err());
        assert!(chat.submit("¿precio?").is_err());
        assert!(chat.display("Cuesta $10", Sender::Bot).is_err());
        assert!(chat.conversation().is_empty());
    }
}
