//! # Starsite Key-Value Store (`common::store`)
//!
//! File: cli/src/common/store.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! A minimal string key-value store, the persistence layer behind the chatbot
//! conversation and the travel simulator preferences. Values are opaque
//! strings; callers serialize their own data (the conversation is stored as a
//! JSON array).
//!
//! ## Architecture
//!
//! - `KeyValueStore`: the trait components depend on.
//! - `FileStore`: keeps every entry in memory and rewrites one JSON object
//!   file on each `set`/`remove`.
//! - `MemoryStore`: a non-persistent store for tests and ephemeral sessions.
//! - `SharedStore`: one store behind a mutex, for several owners (the web
//!   server's chat widget and simulator write the same file).
//!
use crate::common::fs::io;
use crate::core::error::{Result, StarsiteError};
use anyhow::{anyhow, Context};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// String key-value persistence.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// A store persisted as a single JSON object file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns `StarsiteError::Storage` if the file exists but is not a JSON
    /// object of string values.
    pub fn open(path: &Path) -> Result<Self> {
        let entries: BTreeMap<String, String> = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read store {}", path.display()))?;
            serde_json::from_str(&content).map_err(|e| {
                anyhow!(StarsiteError::Storage(format!(
                    "{} is not a valid store file: {}",
                    path.display(),
                    e
                )))
            })?
        } else {
            debug!("Store {} does not exist yet; starting empty", path.display());
            BTreeMap::new()
        };
        info!("Opened store {} ({} keys)", path.display(), entries.len());
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Writes `entries` to disk, then makes them the in-memory state.
    fn commit(&mut self, entries: BTreeMap<String, String>) -> Result<()> {
        let content = serde_json::to_string_pretty(&entries)?;
        io::write_string_to_file(&self.path, &content)?;
        self.entries = entries;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.clone();
        entries.insert(key.to_string(), value.to_string());
        self.commit(entries)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut entries = self.entries.clone();
        entries.remove(key);
        self.commit(entries)
    }
}

/// An in-memory store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// A cloneable handle to one store; every access locks it.
#[derive(Debug, Default)]
pub struct SharedStore<S> {
    inner: Arc<Mutex<S>>,
}

impl<S> Clone for SharedStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> SharedStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, S> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: KeyValueStore> KeyValueStore for SharedStore<S> {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.lock().set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.lock().remove(key)
    }
}
