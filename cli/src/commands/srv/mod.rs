//! # Starsite Web Server
//!
//! File: cli/src/commands/srv/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Serves the single-page starfield site locally: the page shell, the
//! hash-routed views and the JSON API used by the chatbot, the travel
//! simulator and the talking button.
//!
//! ## Architecture
//!
//! - `config.rs`: merges `srv` arguments with the `[server]` settings
//! - `server_logic.rs`: Axum application, shared state and handlers
//!
//! ## Examples
//!
//! ```bash
//! # Serve on the configured port (8000 by default)
//! starsite srv
//!
//! # Bind all interfaces on port 9000 without CORS
//! starsite srv --port 9000 --host 0.0.0.0 --no-cors
//! ```
//!
//! Server startup flow:
//! 1. Merge command-line arguments with the loaded configuration
//! 2. Find an available port (if the requested one is in use)
//! 3. Load responses and planets, open the store, restore the chat
//! 4. Serve until Ctrl+C or SIGTERM
//!
use starsite::core::config::Config;
use starsite::core::error::Result;
use tracing::info;

pub use config::SrvArgs;

pub mod config;
pub mod server_logic;

/// Entry point for `starsite srv`.
pub async fn handle_srv(args: SrvArgs, cfg: &Config) -> Result<()> {
    info!("Handling srv command with args: {:?}", args);

    let config = config::ServerConfig::merge(&args, &cfg.server);
    info!("Effective server config: {:?}", config);

    server_logic::run_server(config, cfg).await
}
