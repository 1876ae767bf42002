//! # Starsite Travel Simulator
//!
//! File: cli/src/simulator/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Computes how long a trip to another world takes at a fraction of light
//! speed: `years = distance / (speed% / 100)`.
//!
//! - `planets`: the destination list, loaded once at startup. A failed load
//!   leaves the list empty; distances can still be typed in by hand.
//! - `travel`: validation, the calculation itself and the remembered
//!   distance/speed that pre-fill the form on the next visit.
//!
pub mod planets;
pub mod travel;

pub use planets::{find_planet, load_planets, load_planets_or_empty, Planet};
pub use travel::{format_years, submit, travel_time, TravelPreferences, TravelResult};
