//! # Starsite Main Entry Point
//!
//! File: cli/src/main.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This file is the entry point of the `starsite` CLI. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Loading the configuration once and routing to a command handler
//!
//! ## Examples
//!
//! ```bash
//! # Chat with the keyword bot
//! starsite chat
//!
//! # Render a view the way a hash change would
//! starsite view '#simulator'
//!
//! # Travel time to a listed planet at 50% of light speed
//! starsite -v travel --planet "Proxima b" --speed 50
//!
//! # Serve the single-page site
//! starsite srv --port 9000
//! ```
//!
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Handlers for each subcommand (chat, view, travel, ...)

use starsite::core::config;

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "starsite",
    about = "✨ Starsite: keyword chatbot, view router and travel simulator",
    long_about = "Chat with the keyword bot, render the starfield site's views, compute\n\
                  interstellar travel times, press the talking button, or serve it all locally.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Read configuration from this file instead of the user/project files.
    #[arg(long, global = true, env = "STARSITE_CONFIG")]
    config: Option<PathBuf>,
}

/// All available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    /// Chat with the keyword bot (conversation is persisted).
    Chat(commands::chat::ChatArgs),
    /// Render one site view for a navigation key or hash fragment.
    View(commands::view::ViewArgs),
    /// Compute the travel time to a distance or listed planet.
    Travel(commands::travel::TravelArgs),
    /// List the planets available to the simulator.
    Planets(commands::planets::PlanetsArgs),
    /// Press the talking button.
    Button(commands::button::ButtonArgs),
    /// Serve the single-page site and its JSON API.
    Srv(commands::srv::SrvArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match config::load_config(cli.config.as_deref()) {
        Ok(cfg) => match cli.command {
            Commands::Chat(args) => commands::chat::handle_chat(args, &cfg).await,
            Commands::View(args) => commands::view::handle_view(args, &cfg).await,
            Commands::Travel(args) => commands::travel::handle_travel(args, &cfg).await,
            Commands::Planets(args) => commands::planets::handle_planets(args, &cfg).await,
            Commands::Button(args) => commands::button::handle_button(args).await,
            Commands::Srv(args) => commands::srv::handle_srv(args, &cfg).await,
        },
        Err(e) => Err(e),
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
