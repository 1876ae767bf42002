//! # Starsite CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test runs
//! the compiled `starsite` binary against a `Sandbox`: a temporary directory
//! holding a response table, a planet list, a store file and a config file
//! that points at all three.
//!

// Each test file uses a different subset of these helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const RESPONSES: &str = r#"{
    "welcome": "¡Bienvenido a Starsite!",
    "hola": "¡Hola, viajero!",
    "planeta": "Tenemos varios destinos.",
    "default": "No sé responder eso."
}"#;

pub const PLANETS: &str = r#"[
    {"name": "Proxima b", "distance": 4.24},
    {"name": "TRAPPIST-1e", "distance": 39.5}
]"#;

/// Get a `Command` for the compiled `starsite` binary.
pub fn starsite_cmd() -> Command {
    Command::cargo_bin("starsite").expect("Failed to find starsite binary for testing")
}

/// A throwaway data directory with a config file pointing into it.
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self::with_data(Some(RESPONSES), Some(PLANETS))
    }

    /// Writes only the data files given; a `None` leaves that path missing.
    pub fn with_data(responses: Option<&str>, planets: Option<&str>) -> Self {
        let dir = TempDir::new().expect("Failed to create sandbox dir");
        if let Some(responses) = responses {
            fs::write(dir.path().join("responses.json"), responses).expect("write responses");
        }
        if let Some(planets) = planets {
            fs::write(dir.path().join("planets.json"), planets).expect("write planets");
        }
        let sandbox = Self { dir };
        sandbox.set_typing_delay(0);
        sandbox
    }

    /// Rewrites the config file with the given chat typing delay.
    pub fn set_typing_delay(&self, typing_delay_ms: u64) {
        let dir = self.dir.path();
        let config = format!(
            "[chatbot]\nresponses = '{}'\ntyping_delay_ms = {}\n\n[simulator]\nplanets = '{}'\n\n[storage]\npath = '{}'\n",
            dir.join("responses.json").display(),
            typing_delay_ms,
            dir.join("planets.json").display(),
            dir.join("store/storage.json").display(),
        );
        fs::write(dir.join("starsite.toml"), config).expect("write config");
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("starsite.toml")
    }

    pub fn storage_path(&self) -> PathBuf {
        self.dir.path().join("store/storage.json")
    }

    /// Parsed store contents, or `None` if nothing was written yet.
    pub fn stored(&self) -> Option<serde_json::Value> {
        let content = fs::read_to_string(self.storage_path()).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// A `starsite` command using this sandbox's config.
    pub fn cmd(&self) -> Command {
        let mut cmd = starsite_cmd();
        cmd.arg("--config")
            .arg(self.config_path())
            .env_remove("RUST_LOG")
            .current_dir(self.path());
        cmd
    }
}
