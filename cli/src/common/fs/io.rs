//! # Starsite Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Small wrappers around `std::fs` / `tokio::fs` with consistent error
//! context:
//! - **`ensure_dir_exists`**: creates a directory (and parents) if missing and
//!   rejects paths that exist but are not directories.
//! - **`write_string_to_file`**: writes a whole file, creating its parent
//!   directory first. Used by the file-backed key-value store.
//! - **`read_source`**: asynchronously reads a data source document
//!   (response table, planet list). Failures become `StarsiteError::Load` so
//!   the loading boundary can turn them into a notice.
//!
use crate::core::error::{Result, StarsiteError};
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Ensures that a directory exists at the specified path.
///
/// If the path does not exist, it is created together with any missing
/// parents (like `mkdir -p`).
///
/// # Errors
///
/// Returns an `Err` if:
/// - The path exists but is not a directory.
/// - Creating the directory fails (e.g., due to permissions).
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!(StarsiteError::Storage(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Writes string content to a file, overwriting it if it exists.
///
/// The parent directory is created first when missing.
pub fn write_string_to_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir_exists(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write to file {:?}", path))?;
    debug!("Wrote {} bytes to {:?}", content.len(), path);
    Ok(())
}

/// Reads a data source document into a string.
///
/// # Errors
///
/// Returns `StarsiteError::Load` when the file is missing or unreadable.
pub async fn read_source(path: &Path) -> Result<String> {
    debug!("Fetching data source {:?}", path);
    tokio::fs::read_to_string(path).await.map_err(|e| {
        anyhow::anyhow!(StarsiteError::Load(format!(
            "could not read {}: {}",
            path.display(),
            e
        )))
    })
}
