//! # Starsite Planets Command
//!
//! File: cli/src/commands/planets.rs
//! Author: Christi Mahu
//!
//! Lists the planets the simulator offers, in file order.
//!
use clap::Parser;
use starsite::core::config::Config;
use starsite::core::error::Result;
use starsite::simulator;
use std::path::Path;

#[derive(Parser, Debug)]
pub struct PlanetsArgs {
    /// Print the list as JSON.
    #[arg(long)]
    pub json: bool,
}

pub async fn handle_planets(args: PlanetsArgs, cfg: &Config) -> Result<()> {
    let planets = simulator::load_planets(Path::new(&cfg.simulator.planets)).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&planets)?);
        return Ok(());
    }

    if planets.is_empty() {
        println!("No hay planetas disponibles.");
        return Ok(());
    }
    let width = planets.iter().map(|p| p.name.chars().count()).max().unwrap_or(0);
    for planet in &planets {
        println!("{:<width$}  {} años luz", planet.name, planet.distance, width = width);
    }
    Ok(())
}
