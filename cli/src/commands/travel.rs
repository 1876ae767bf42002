//! # Starsite Travel Command
//!
//! File: cli/src/commands/travel.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Computes the travel time to a destination at a percentage of light
//! speed. The distance comes from `--distance`, from a listed planet
//! (`--planet`), or from the last value submitted; the speed from `--speed`
//! or the last value submitted. Valid submissions are remembered in the
//! persistent store; invalid ones change nothing.
//!
//! ```bash
//! starsite travel --distance 10 --speed 50     # 20.00 años
//! starsite travel --planet "Proxima b" --speed 25
//! starsite travel                              # repeat the last trip
//! ```
//!
use super::open_store;
use anyhow::anyhow;
use clap::Parser;
use starsite::core::config::Config;
use starsite::core::error::{Result, StarsiteError};
use starsite::simulator::{self, TravelPreferences};
use std::path::Path;
use tracing::{debug, info};

#[derive(Parser, Debug)]
pub struct TravelArgs {
    /// Distance in light-years.
    #[arg(long, short, allow_negative_numbers = true, conflicts_with = "planet")]
    pub distance: Option<f64>,

    /// Take the distance from a listed planet (case-insensitive).
    #[arg(long, short)]
    pub planet: Option<String>,

    /// Speed as a percentage of light speed (0, 100].
    #[arg(long, short, allow_negative_numbers = true)]
    pub speed: Option<f64>,
}

pub async fn handle_travel(args: TravelArgs, cfg: &Config) -> Result<()> {
    info!("Handling travel command with args: {:?}", args);

    let mut store = open_store(cfg)?;
    let remembered = TravelPreferences::load(&store);
    debug!("Remembered values: {:?}", remembered);

    let distance = match (&args.distance, &args.planet) {
        (Some(distance), _) => *distance,
        (None, Some(name)) => {
            let planets = simulator::load_planets(Path::new(&cfg.simulator.planets)).await?;
            simulator::find_planet(&planets, name)
                .map(|p| p.distance)
                .ok_or_else(|| {
                    anyhow!(StarsiteError::Validation(format!(
                        "planeta desconocido '{}'",
                        name
                    )))
                })?
        }
        (None, None) => remembered.distance.ok_or_else(|| {
            anyhow!(StarsiteError::Validation(
                "falta la distancia (usa --distance o --planet)".to_string()
            ))
        })?,
    };
    let speed = args.speed.or(remembered.speed).ok_or_else(|| {
        anyhow!(StarsiteError::Validation(
            "falta la velocidad (usa --speed)".to_string()
        ))
    })?;

    let result = simulator::submit(&mut store, distance, speed)?;
    println!(
        "Tiempo de viaje: {} años ({} años luz al {}% de la velocidad de la luz)",
        result.formatted, result.distance, result.speed
    );
    Ok(())
}
