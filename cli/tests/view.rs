//! # Starsite CLI View Integration Tests
//!
//! File: cli/tests/view.rs
//! Author: Christi Mahu
//!
//! `starsite view` resolves a fragment through the site's router and prints
//! the rendered view.
//!
mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_fragment_renders_simulator() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["view", "#simulator"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Simulador de viaje")
                .and(predicate::str::contains("Proxima b"))
                .and(predicate::str::contains("TRAPPIST-1e")),
        );
}

#[test]
fn test_unknown_and_empty_fragments_render_home() {
    let sandbox = Sandbox::new();
    for fragment in ["#contact", "", "#/"] {
        sandbox
            .cmd()
            .args(["view", fragment])
            .assert()
            .success()
            .stdout(predicate::str::contains("Bienvenido a Starsite"));
    }
}

#[test]
fn test_about_shows_current_year() {
    let sandbox = Sandbox::new();
    let year = chrono::Local::now().format("%Y").to_string();
    sandbox
        .cmd()
        .args(["view", "about"])
        .assert()
        .success()
        .stdout(predicate::str::contains(year));
}

#[test]
fn test_simulator_prefilled_after_travel() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["travel", "--distance", "12.5", "--speed", "50"])
        .assert()
        .success();
    sandbox
        .cmd()
        .args(["view", "simulator"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"value="12.5""#));
}

#[test]
fn test_simulator_without_planets_still_renders() {
    let sandbox = Sandbox::with_data(Some(RESPONSES), None);
    sandbox
        .cmd()
        .args(["view", "simulator"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Distancia manual"))
        .stderr(predicate::str::contains("No se pudieron cargar los planetas"));
}

#[test]
fn test_list_marks_default_route() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["view", "--list"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("#home (default)")
                .and(predicate::str::contains("#button")),
        );
}
