//! # Starsite Travel Calculation
//!
//! File: cli/src/simulator/travel.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Travel-time calculation, input validation and the remembered form values.
//!
//! - Distances must be finite and positive; speeds lie in `(0, 100]` percent
//!   of light speed.
//! - A result too large to represent is rejected like any other bad input.
//! - Only a successful submission writes `lastDistance` and `lastSpeed`.
//!
use crate::common::store::KeyValueStore;
use crate::core::error::{Result, StarsiteError};
use anyhow::anyhow;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Store key for the last submitted distance.
pub const LAST_DISTANCE_KEY: &str = "lastDistance";
/// Store key for the last submitted speed.
pub const LAST_SPEED_KEY: &str = "lastSpeed";

/// Years needed to cover `distance` light-years at `speed_percent` % of light speed.
///
/// # Errors
///
/// `StarsiteError::Validation` unless `distance > 0` and `0 < speed_percent <= 100`
/// (both finite), or when the resulting time overflows.
pub fn travel_time(distance: f64, speed_percent: f64) -> Result<f64> {
    if !distance.is_finite() || distance <= 0.0 {
        return Err(anyhow!(StarsiteError::Validation(format!(
            "la distancia debe ser un número mayor que 0 (recibido {})",
            distance
        ))));
    }
    if !speed_percent.is_finite() || speed_percent <= 0.0 || speed_percent > 100.0 {
        return Err(anyhow!(StarsiteError::Validation(format!(
            "la velocidad debe estar entre 0 y 100 % de la luz (recibido {})",
            speed_percent
        ))));
    }
    let years = distance / (speed_percent / 100.0);
    if !years.is_finite() {
        return Err(anyhow!(StarsiteError::Validation(format!(
            "el tiempo de viaje para {} años luz al {}% de la luz es demasiado grande",
            distance, speed_percent
        ))));
    }
    Ok(years)
}

/// Two-decimal rendering used for results.
pub fn format_years(years: f64) -> String {
    format!("{:.2}", years)
}

/// Last values entered in the simulator form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TravelPreferences {
    pub distance: Option<f64>,
    pub speed: Option<f64>,
}

impl TravelPreferences {
    /// Reads the remembered values. Unparseable entries are ignored.
    pub fn load(store: &impl KeyValueStore) -> Self {
        Self {
            distance: read_number(store, LAST_DISTANCE_KEY),
            speed: read_number(store, LAST_SPEED_KEY),
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<()> {
        if let Some(distance) = self.distance {
            store.set(LAST_DISTANCE_KEY, &distance.to_string())?;
        }
        if let Some(speed) = self.speed {
            store.set(LAST_SPEED_KEY, &speed.to_string())?;
        }
        Ok(())
    }
}

fn read_number(store: &impl KeyValueStore, key: &str) -> Option<f64> {
    let raw = store.get(key)?;
    match raw.parse::<f64>() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring stored {} = {:?}: {}", key, raw, e);
            None
        }
    }
}

/// A successful calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TravelResult {
    pub distance: f64,
    pub speed: f64,
    pub years: f64,
    /// `years` with two decimals.
    pub formatted: String,
}

/// Validates the form values, remembers them and computes the travel time.
///
/// Nothing is written to `store` when validation fails.
pub fn submit(store: &mut impl KeyValueStore, distance: f64, speed: f64) -> Result<TravelResult> {
    let years = travel_time(distance, speed)?;
    TravelPreferences {
        distance: Some(distance),
        speed: Some(speed),
    }
    .save(store)?;
    let result = TravelResult {
        distance,
        speed,
        years,
        formatted: format_years(years),
    };
    info!(
        "Travel of {} ly at {}% c takes {} years",
        distance, speed, result.formatted
    );
    debug!("Remembered distance/speed for the next visit");
    Ok(result)
}
