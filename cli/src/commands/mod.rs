//! # Starsite Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module aggregates the subcommands of the Starsite CLI. Each command
//! defines its own Clap argument struct and an async `handle_*` function that
//! receives the parsed arguments and the loaded configuration.
//!
//! ## Commands
//!
//! - `chat`: interactive chat with the keyword bot
//! - `view`: render one site view for a hash fragment
//! - `travel`: travel-time calculation with remembered values
//! - `planets`: list the simulator's planets
//! - `button`: the talking button
//! - `srv`: HTTP server for the single-page site and its JSON API
//!
pub mod button;
pub mod chat;
pub mod planets;
pub mod srv;
pub mod travel;
pub mod view;

use starsite::common::fs::io;
use starsite::common::store::FileStore;
use starsite::core::config::Config;
use starsite::core::error::Result;
use std::path::Path;

/// Opens the persistent store named by the configuration, creating its
/// directory if needed.
pub(crate) fn open_store(cfg: &Config) -> Result<FileStore> {
    let path = Path::new(&cfg.storage.path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        io::ensure_dir_exists(parent)?;
    }
    FileStore::open(path)
}
