//! # Starsite Planet Destinations
//!
//! File: cli/src/simulator/planets.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The destinations offered by the simulator, read from a JSON array of
//! `{ "name", "distance" }` objects and kept in file order.
//!
use crate::common::fs::io;
use crate::common::ui::{self, Notice};
use crate::core::error::{Result, StarsiteError};
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// A destination and its distance in light-years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    pub name: String,
    pub distance: f64,
}

/// Parses a JSON array of `{ "name", "distance" }` records, keeping order.
pub fn parse_planets(document: &str) -> Result<Vec<Planet>> {
    serde_json::from_str(document)
        .map_err(|e| anyhow!(StarsiteError::Load(format!("malformed planet data: {}", e))))
}

/// Reads and parses the planet list at `path`.
pub async fn load_planets(path: &Path) -> Result<Vec<Planet>> {
    let document = io::read_source(path).await?;
    let planets = parse_planets(&document)?;
    info!("Loaded {} planets from {}", planets.len(), path.display());
    Ok(planets)
}

/// Like [`load_planets`], but a failure is shown as a notice and yields an
/// empty list. The simulator stays usable through manual distance entry.
pub async fn load_planets_or_empty(path: &Path) -> Vec<Planet> {
    match load_planets(path).await {
        Ok(planets) => planets,
        Err(e) => {
            ui::notice(&Notice::new(
                "Error",
                format!("No se pudieron cargar los planetas: {:#}", e),
            ));
            Vec::new()
        }
    }
}

/// Case-insensitive lookup by name.
pub fn find_planet<'a>(planets: &'a [Planet], name: &str) -> Option<&'a Planet> {
    let name = name.trim();
    planets.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}
