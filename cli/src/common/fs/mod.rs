//! # Starsite Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Filesystem helpers used by the store and the data-source loaders. Import
//! from the submodule directly, e.g. `crate::common::fs::io::read_source`.
//!

/// Basic file I/O (`ensure_dir_exists`, `write_string_to_file`, `read_source`).
pub mod io;
