//! # Starsite Talking Button
//!
//! File: cli/src/button.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! A button that says a random phrase on every press and counts presses.
//! The counter lives in the `TalkingButton` value owned by whoever presents
//! the button (the `button` command, the web server state).
//!
//! - At exactly 3 presses the user is offered a counter reset.
//! - Otherwise, every 5th press is a milestone worth mentioning.
//!
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

/// Phrases used when none are configured.
pub const DEFAULT_PHRASES: [&str; 6] = [
    "Hola, ¿cómo estás?",
    "¡Qué gusto verte!",
    "Este es un botón parlante.",
    "Que tengas un excelente día.",
    "¿Necesitas algo?",
    "¡Volvé pronto!",
];

const RESET_OFFER_AT: u32 = 3;
const MILESTONE_EVERY: u32 = 5;

/// Something noteworthy about a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "count", rename_all = "snake_case")]
pub enum PressEvent {
    /// The caller should ask whether to reset the counter.
    OfferReset,
    /// The counter reached a multiple of five.
    Milestone(u32),
}

/// Result of one press.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Press {
    pub phrase: String,
    pub count: u32,
    pub event: Option<PressEvent>,
}

#[derive(Debug, Clone)]
pub struct TalkingButton {
    phrases: Vec<String>,
    press_count: u32,
}

impl Default for TalkingButton {
    fn default() -> Self {
        Self::new(DEFAULT_PHRASES.iter().map(|p| p.to_string()).collect())
    }
}

impl TalkingButton {
    /// Creates a button; an empty phrase list falls back to [`DEFAULT_PHRASES`].
    pub fn new(phrases: Vec<String>) -> Self {
        if phrases.is_empty() {
            return Self::default();
        }
        Self {
            phrases,
            press_count: 0,
        }
    }

    pub fn press_count(&self) -> u32 {
        self.press_count
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn press<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Press {
        self.press_count += 1;
        let phrase = self
            .phrases
            .choose(rng)
            .cloned()
            .unwrap_or_default();
        info!(count = self.press_count, "Button pressed: {:?}", phrase);

        if self.press_count == 1 {
            for (i, p) in self.phrases.iter().enumerate() {
                debug!("Phrase #{}: {}", i + 1, p);
            }
        }

        let event = if self.press_count == RESET_OFFER_AT {
            Some(PressEvent::OfferReset)
        } else if self.press_count % MILESTONE_EVERY == 0 {
            Some(PressEvent::Milestone(self.press_count))
        } else {
            None
        };

        Press {
            phrase,
            count: self.press_count,
            event,
        }
    }

    pub fn reset(&mut self) {
        info!("Press counter reset after {} presses", self.press_count);
        self.press_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_press_picks_known_phrase_and_counts() {
        let mut button = TalkingButton::default();
        let mut rng = StdRng::seed_from_u64(7);
        let press = button.press(&mut rng);
        assert!(DEFAULT_PHRASES.contains(&press.phrase.as_str()));
        assert_eq!(press.count, 1);
        assert_eq!(button.press_count(), 1);
    }

    #[test]
    fn test_events_follow_counter() {
        let mut button = TalkingButton::default();
        let mut rng = StdRng::seed_from_u64(1);
        let events: Vec<Option<PressEvent>> = (0..10).map(|_| button.press(&mut rng).event).collect();
        assert_eq!(events[2], Some(PressEvent::OfferReset));
        assert_eq!(events[4], Some(PressEvent::Milestone(5)));
        assert_eq!(events[9], Some(PressEvent::Milestone(10)));
        assert_eq!(events.iter().filter(|e| e.is_some()).count(), 3);
    }

    #[test]
    fn test_reset_restarts_cycle() {
        let mut button = TalkingButton::default();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..3 {
            button.press(&mut rng);
        }
        button.reset();
        assert_eq!(button.press_count(), 0);
        assert_eq!(button.press(&mut rng).count, 1);
    }

    #[test]
    fn test_empty_phrase_list_uses_defaults() {
        let button = TalkingButton::new(Vec::new());
        assert_eq!(button.phrases().len(), DEFAULT_PHRASES.len());
    }

    #[test]
    fn test_event_serializes_with_kind_tag() {
        let json = serde_json::to_string(&PressEvent::Milestone(5)).unwrap();
        assert_eq!(json, r#"{"kind":"milestone","count":5}"#);
        let json = serde_json::to_string(&PressEvent::OfferReset).unwrap();
        assert_eq!(json, r#"{"kind":"offer_reset"}"#);
    }
}
