//! # Starsite Server Configuration
//!
//! File: cli/src/commands/srv/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Merges the `srv` command-line arguments with the `[server]` section of
//! the loaded configuration. Explicit arguments win; anything not given on
//! the command line comes from the configuration file (or its defaults).
//!
//! ```toml
//! # .starsite.toml
//! [server]
//! port = 9000
//! host = "0.0.0.0"
//! enable_cors = false
//! ```
//!
use clap::Parser;
use starsite::core::config::ServerDefaults;
use std::net::IpAddr;
use tracing::debug;

/// Command-line arguments for `starsite srv`.
#[derive(Parser, Debug)]
pub struct SrvArgs {
    /// Port to listen on; the next free port is used if it is taken.
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Interface to bind.
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Disable the permissive CORS layer.
    #[arg(long)]
    pub no_cors: bool,
}

/// Effective server settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub host: IpAddr,
    pub enable_cors: bool,
}

impl ServerConfig {
    pub fn merge(args: &SrvArgs, defaults: &ServerDefaults) -> Self {
        let config = Self {
            port: args.port.unwrap_or(defaults.port),
            host: args.host.unwrap_or(defaults.host),
            enable_cors: defaults.enable_cors && !args.no_cors,
        };
        debug!("Merged server config {:?} from args {:?}", config, args);
        config
    }
}
