//! # Starsite CLI Button Integration Tests
//!
//! File: cli/tests/button.rs
//! Author: Christi Mahu
//!
mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_scripted_presses_reach_milestone() {
    starsite_cmd()
        .args(["button", "--presses", "5"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("¡Llevas 5 interacciones!")
                .and(predicate::str::contains("Veces presionado: 5")),
        );
}

#[test]
fn test_reset_offer_accepted() {
    starsite_cmd()
        .arg("button")
        .write_stdin("\n\n\ns\n\nq\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("¿Quieres reiniciar el contador?")
                .and(predicate::str::contains("¡Contador reiniciado!"))
                .and(predicate::str::contains("Veces presionado: 1")),
        );
}

#[test]
fn test_reset_offer_declined() {
    starsite_cmd()
        .arg("button")
        .write_stdin("\n\n\nn\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("¡Contador reiniciado!")
                .not()
                .and(predicate::str::contains("Veces presionado: 3")),
        );
}

#[test]
fn test_greets_by_name() {
    starsite_cmd()
        .args(["button", "--name", "Ada", "--presses", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("¡Hola, Ada!"));
}
