//! # Starsite Template System
//!
//! File: cli/src/core/templating.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module wraps the Tera engine used to render the site's views into
//! HTML fragments. The templates are compiled into the binary with
//! `include_str!` and registered once; route render functions then call
//! [`Views::render`] with a context built from the current state.
//!
//! ## Architecture
//!
//! - `shell`: the full page served at `/`, with navigation links and the
//!   `<main>` element that fragments are mounted into on hash change.
//! - `home`, `about`, `simulator`, `chat`, `button`: one fragment per route.
//!
//! Every render receives a `year` variable for the footer in addition to the
//! caller's context.
//!
//! ## Examples
//!
//! ```rust,ignore
//! let views = Views::new()?;
//! let mut context = tera::Context::new();
//! context.insert("planets", &planets);
//! let html = views.render("simulator", &context)?;
//! ```
//!
use crate::core::error::{Result, StarsiteError};
use anyhow::{anyhow, Context};
use chrono::Datelike;
use tera::Tera;
use tracing::debug;

const TEMPLATES: [(&str, &str); 6] = [
    ("shell.html", include_str!("../../templates/shell.html.tera")),
    ("home.html", include_str!("../../templates/home.html.tera")),
    ("about.html", include_str!("../../templates/about.html.tera")),
    ("simulator.html", include_str!("../../templates/simulator.html.tera")),
    ("chat.html", include_str!("../../templates/chat.html.tera")),
    ("button.html", include_str!("../../templates/button.html.tera")),
];

// Registered with an `.html` suffix so Tera autoescapes interpolated values.
const TEMPLATE_SUFFIX: &str = ".html";

/// Compiled view templates.
#[derive(Debug, Clone)]
pub struct Views {
    tera: Tera,
}

impl Views {
    /// Compiles the embedded templates.
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.to_vec())
            .map_err(|e| anyhow!(StarsiteError::Template { source: e }))
            .context("Failed to compile embedded view templates")?;
        debug!("Registered {} view templates", TEMPLATES.len());
        Ok(Self { tera })
    }

    /// Renders the template `name` with `context` plus the current `year`.
    pub fn render(&self, name: &str, context: &tera::Context) -> Result<String> {
        let mut context = context.clone();
        context.insert("year", &chrono::Local::now().year());
        let template = format!("{}{}", name, TEMPLATE_SUFFIX);
        self.tera.render(&template, &context).map_err(|e| {
            anyhow!(StarsiteError::Template { source: e })
                .context(format!("Tera rendering failed for view '{}'", name))
        })
    }

    /// Names of all registered templates.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .tera
            .get_template_names()
            .filter_map(|name| name.strip_suffix(TEMPLATE_SUFFIX))
            .collect();
        names.sort_unstable();
        names
    }
}
