//! # Starsite View Command
//!
//! File: cli/src/commands/view.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Renders one site view to stdout exactly as a hash change would in the
//! browser: the fragment is resolved through the `ViewRouter`, unknown or
//! empty fragments fall back to `home`, and the route's attach hook runs
//! after the HTML is printed.
//!
//! ```bash
//! starsite view '#simulator'
//! starsite view about
//! starsite view --list
//! ```
//!
use super::open_store;
use clap::Parser;
use starsite::core::config::Config;
use starsite::core::error::Result;
use starsite::core::templating::Views;
use starsite::router::TerminalSurface;
use starsite::simulator::{self, TravelPreferences};
use starsite::site::{self, SiteContext};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
pub struct ViewArgs {
    /// Navigation key or hash fragment (`home`, `#simulator`, ...).
    #[arg(default_value = "")]
    pub fragment: String,

    /// List the registered routes instead of rendering one.
    #[arg(long)]
    pub list: bool,
}

pub async fn handle_view(args: ViewArgs, cfg: &Config) -> Result<()> {
    info!("Handling view command for fragment {:?}", args.fragment);

    let planets = simulator::load_planets_or_empty(Path::new(&cfg.simulator.planets)).await;
    let preferences = TravelPreferences::load(&open_store(cfg)?);
    let context = Arc::new(SiteContext::new(Views::new()?, planets, preferences));
    let mut router = site::build_router(context, TerminalSurface);

    if args.list {
        for key in site::ROUTES {
            let marker = if key == router.default_key() { " (default)" } else { "" };
            println!("#{}{}", key, marker);
        }
        return Ok(());
    }

    router.navigate_fragment(&args.fragment)?;
    info!("Rendered view '{}'", router.current_key());
    Ok(())
}
