//! # Starsite UI Utilities Module (`common::ui`)
//!
//! File: cli/src/common/ui/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! User-visible notices for the terminal. Load failures (response table,
//! planet list) are not fatal: the loading boundary reports them here and the
//! application continues with an empty fallback.
//!
//! A notice is printed to stderr as a framed block and mirrored to the log at
//! `warn` level so it also shows up in server logs.
//!
use std::fmt;
use tracing::warn;

/// A dismissible message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub text: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "┌─ ⚠️  {}", self.title)?;
        write!(f, "└─ {}", self.text)
    }
}

/// Shows `notice` on stderr and logs it.
pub fn notice(notice: &Notice) {
    warn!(title = %notice.title, "{}", notice.text);
    eprintln!("{}", notice);
}
