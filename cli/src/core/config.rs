//! # Starsite Configuration System
//!
//! File: cli/src/core/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module loads, merges and validates the Starsite configuration. It tells
//! the rest of the application where the data sources live (response table,
//! planet list), where the key-value store is persisted, how long the chatbot
//! "types" before answering, and the defaults for the local web server.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. An explicit file passed with `--config` / `STARSITE_CONFIG` (used alone)
//! 2. Project-specific `.starsite.toml` in the current directory or ancestors
//! 3. User-specific `config.toml` in the platform config directory
//! 4. Default values defined in the code
//!
//! Paths are `~`-expanded and the merged result is validated before use.
//!
//! ## Examples
//!
//! ```toml
//! [chatbot]
//! responses = "./responses.json"
//! typing_delay_ms = 500
//!
//! [simulator]
//! planets = "./planets.json"
//!
//! [storage]
//! path = "~/.starsite/storage.json"
//!
//! [server]
//! port = 8000
//! host = "127.0.0.1"
//! enable_cors = true
//! ```
//!
use crate::core::error::{Result, StarsiteError};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use toml::{Table, Value};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub chatbot: ChatbotConfig,
    #[serde(default)]
    pub simulator: SimulatorConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub server: ServerDefaults,
}

/// Settings for the keyword chatbot.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ChatbotConfig {
    /// Path to the JSON response table (can use ~).
    #[serde(default = "default_responses_path")]
    pub responses: String,
    /// Delay before a bot reply is shown, in milliseconds.
    #[serde(default = "default_typing_delay_ms")]
    pub typing_delay_ms: u64,
}

/// Settings for the travel simulator.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SimulatorConfig {
    /// Path to the JSON planet list (can use ~).
    #[serde(default = "default_planets_path")]
    pub planets: String,
}

/// Where the key-value store (conversation, preferences) is persisted.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: String,
}

/// Defaults for `starsite srv`. Command-line flags override these.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerDefaults {
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_server_host")]
    pub host: IpAddr,
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
}

impl Default for ChatbotConfig {
    fn default() -> Self {
        Self {
            responses: default_responses_path(),
            typing_delay_ms: default_typing_delay_ms(),
        }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            planets: default_planets_path(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

impl Default for ServerDefaults {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            host: default_server_host(),
            enable_cors: default_enable_cors(),
        }
    }
}

impl ChatbotConfig {
    pub fn typing_delay(&self) -> Duration {
        Duration::from_millis(self.typing_delay_ms)
    }
}

fn default_responses_path() -> String {
    "./responses.json".to_string()
}
fn default_typing_delay_ms() -> u64 {
    500
}
fn default_planets_path() -> String {
    "./planets.json".to_string()
}
fn default_storage_path() -> String {
    "~/.starsite/storage.json".to_string()
}
fn default_server_port() -> u16 {
    8000
}
fn default_server_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}
fn default_enable_cors() -> bool {
    true
}

const PROJECT_CONFIG_FILENAME: &str = ".starsite.toml";
const MAX_TYPING_DELAY_MS: u64 = 10_000;

/// Loads the effective configuration.
///
/// With an `explicit` path only that file is read (on top of defaults);
/// otherwise the user and project files are merged key by key.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let mut config = match explicit {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            config_from_table(read_config_table(path)?)?
        }
        None => {
            let user_table = load_user_config()?;
            let project_table = load_project_config()?;
            merge_configs(user_table, project_table)?
        }
    };
    expand_config_paths(&mut config);
    validate_config(&config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", config);
    Ok(config)
}

fn load_user_config() -> Result<Option<Table>> {
    if let Some(proj_dirs) = ProjectDirs::from("dev", "Starsite", "starsite") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            read_config_table(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Table>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    match find_project_config_path(&current_dir) {
        Some(path) => {
            info!("Loading project configuration from: {}", path.display());
            read_config_table(&path).map(Some)
        }
        None => {
            debug!("No {} found in current directory or ancestors.", PROJECT_CONFIG_FILENAME);
            Ok(None)
        }
    }
}

/// Walks up from `start` looking for `.starsite.toml`, stopping at a `.git` directory.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

/// Reads a config file as a raw table, checking it against the schema.
fn read_config_table(path: &Path) -> Result<Table> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    let table: Table = toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))?;
    config_from_table(table.clone())
        .with_context(|| format!("Invalid configuration in file: {}", path.display()))?;
    Ok(table)
}

fn config_from_table(table: Table) -> Result<Config> {
    let config = Value::Table(table).try_into()?;
    Ok(config)
}

/// Every key written in the project file wins, even one equal to its default.
fn merge_configs(user: Option<Table>, project: Option<Table>) -> Result<Config> {
    let mut merged = user.unwrap_or_default();
    if let Some(project) = project {
        merge_tables(&mut merged, project);
    }
    config_from_table(merged)
}

fn merge_tables(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        if let Value::Table(nested) = value {
            if let Some(Value::Table(existing)) = base.get_mut(&key) {
                merge_tables(existing, nested);
                continue;
            }
            base.insert(key, Value::Table(nested));
        } else {
            base.insert(key, value);
        }
    }
}

fn expand_config_paths(config: &mut Config) {
    config.chatbot.responses = shellexpand::tilde(&config.chatbot.responses).into_owned();
    config.simulator.planets = shellexpand::tilde(&config.simulator.planets).into_owned();
    config.storage.path = shellexpand::tilde(&config.storage.path).into_owned();
    debug!(
        "Expanded paths: responses={}, planets={}, storage={}",
        config.chatbot.responses, config.simulator.planets, config.storage.path
    );
}

fn validate_config(config: &Config) -> Result<()> {
    let paths = [
        ("chatbot.responses", &config.chatbot.responses),
        ("simulator.planets", &config.simulator.planets),
        ("storage.path", &config.storage.path),
    ];
    for (name, value) in paths {
        if value.trim().is_empty() {
            return Err(anyhow!(StarsiteError::Config(format!(
                "'{}' cannot be empty.",
                name
            ))));
        }
    }
    if config.chatbot.typing_delay_ms > MAX_TYPING_DELAY_MS {
        return Err(anyhow!(StarsiteError::Config(format!(
            "chatbot.typing_delay_ms is {} but must not exceed {}.",
            config.chatbot.typing_delay_ms, MAX_TYPING_DELAY_MS
        ))));
    }
    let storage = Path::new(&config.storage.path);
    if storage.is_dir() {
        return Err(anyhow!(StarsiteError::Config(format!(
            "Storage path '{}' is a directory; expected a file.",
            storage.display()
        ))));
    }
    Ok(())
}
