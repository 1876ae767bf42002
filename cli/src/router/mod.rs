//! # Starsite View Router
//!
//! File: cli/src/router/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! A hash-fragment router. Each route has a `render` function that produces
//! content and an optional `on_attach` hook that wires the route's
//! interactive parts once the content is mounted. Unknown or empty keys fall
//! back to the default route instead of failing.
//!
//! ## Architecture
//!
//! - `ViewRouter<C, S>`: the route table, the default key and the current key,
//!   generic over the content type `C` and the presentation `Surface` `S`.
//! - `Surface<C>`: where rendered content is mounted. `TerminalSurface`
//!   prints it, `CapturedSurface` keeps the last mount for the HTTP server
//!   and for tests.
//!
//! Navigation lifecycle for `navigate(key)`:
//! 1. Resolve `key` (falling back to the default route).
//! 2. Call the route's `render()`. An error propagates to the caller and the
//!    current key is left unchanged.
//! 3. Mount the content on the surface.
//! 4. Call `on_attach(&content)` if the route has one.
//! 5. Record the resolved key as current.
//!
//! ## Examples
//!
//! ```rust,ignore
//! let mut router = ViewRouter::new(CapturedSurface::default()).with_default("home");
//! router.register("home", || Ok("<h1>Home</h1>".to_string()));
//! router.register_with_attach("about", || Ok("<h1>About</h1>".to_string()), |html| {
//!     tracing::debug!("about view attached ({} bytes)", html.len());
//! });
//!
//! router.navigate_fragment("#about")?;
//! assert_eq!(router.current_key(), "about");
//! ```
//!
use crate::core::error::{Result, StarsiteError};
use anyhow::anyhow;
use std::collections::HashMap;
use std::fmt::Display;
use tracing::{debug, info};

/// Produces a route's content.
pub type RenderFn<C> = Box<dyn Fn() -> Result<C> + Send + Sync>;
/// Wires a route's interactive parts after its content is mounted.
pub type AttachFn<C> = Box<dyn FnMut(&C) + Send>;

/// The presentation layer rendered content is mounted on.
pub trait Surface<C> {
    fn mount(&mut self, key: &str, content: &C);
}

/// Prints mounted content to stdout.
#[derive(Debug, Default)]
pub struct TerminalSurface;

impl<C: Display> Surface<C> for TerminalSurface {
    fn mount(&mut self, key: &str, content: &C) {
        debug!("Mounting view '{}' on the terminal", key);
        println!("{}", content);
    }
}

/// Keeps the most recent mount.
#[derive(Debug)]
pub struct CapturedSurface<C> {
    last: Option<(String, C)>,
    mounts: usize,
}

impl<C> Default for CapturedSurface<C> {
    fn default() -> Self {
        Self {
            last: None,
            mounts: 0,
        }
    }
}

impl<C: Clone> CapturedSurface<C> {
    /// Key and content of the last mount.
    pub fn last(&self) -> Option<(&str, &C)> {
        self.last.as_ref().map(|(k, c)| (k.as_str(), c))
    }

    /// Total number of mounts.
    pub fn mounts(&self) -> usize {
        self.mounts
    }
}

impl<C: Clone> Surface<C> for CapturedSurface<C> {
    fn mount(&mut self, key: &str, content: &C) {
        self.last = Some((key.to_string(), content.clone()));
        self.mounts += 1;
    }
}

struct Route<C> {
    render: RenderFn<C>,
    on_attach: Option<AttachFn<C>>,
}

/// Maps navigation keys to render-and-attach lifecycles.
pub struct ViewRouter<C, S> {
    routes: HashMap<String, Route<C>>,
    default_key: String,
    current: String,
    surface: S,
}

impl<C, S: Surface<C>> ViewRouter<C, S> {
    /// Creates an empty router whose default route is the empty-string key.
    pub fn new(surface: S) -> Self {
        Self {
            routes: HashMap::new(),
            default_key: String::new(),
            current: String::new(),
            surface,
        }
    }

    /// Uses `key` as the default route.
    pub fn with_default(mut self, key: &str) -> Self {
        self.default_key = key.to_string();
        self
    }

    /// Adds or replaces the route for `key`.
    pub fn register<R>(&mut self, key: &str, render: R)
    where
        R: Fn() -> Result<C> + Send + Sync + 'static,
    {
        self.insert(key, Box::new(render), None);
    }

    /// Adds or replaces the route for `key`, with an attach hook.
    pub fn register_with_attach<R, A>(&mut self, key: &str, render: R, on_attach: A)
    where
        R: Fn() -> Result<C> + Send + Sync + 'static,
        A: FnMut(&C) + Send + 'static,
    {
        self.insert(key, Box::new(render), Some(Box::new(on_attach)));
    }

    fn insert(&mut self, key: &str, render: RenderFn<C>, on_attach: Option<AttachFn<C>>) {
        if self
            .routes
            .insert(key.to_string(), Route { render, on_attach })
            .is_some()
        {
            debug!("Replaced route '{}'", key);
        }
    }

    /// The key `key` resolves to: itself if registered, else the default key.
    pub fn resolve<'a>(&'a self, key: &'a str) -> Result<&'a str> {
        if !key.is_empty() && self.routes.contains_key(key) {
            return Ok(key);
        }
        if self.routes.contains_key(&self.default_key) {
            return Ok(self.default_key.as_str());
        }
        Err(anyhow!(StarsiteError::RouteNotFound {
            key: key.to_string()
        }))
    }

    /// Renders, mounts and attaches the route for `key`.
    ///
    /// # Errors
    ///
    /// Propagates `render()` failures, and `StarsiteError::RouteNotFound` if
    /// neither `key` nor the default route is registered. In both cases
    /// `current_key()` keeps its previous value.
    pub fn navigate(&mut self, key: &str) -> Result<()> {
        let resolved = self.resolve(key)?.to_string();
        if resolved != key {
            debug!("No route '{}', falling back to '{}'", key, resolved);
        }
        let route = self
            .routes
            .get_mut(&resolved)
            .ok_or_else(|| anyhow!(StarsiteError::RouteNotFound { key: resolved.clone() }))?;

        let content = (route.render)()?;
        self.surface.mount(&resolved, &content);
        if let Some(on_attach) = route.on_attach.as_mut() {
            on_attach(&content);
        }

        info!("Navigated to '{}'", resolved);
        self.current = resolved;
        Ok(())
    }

    /// Navigates to a URL hash fragment such as `#about` or `#/about`.
    pub fn navigate_fragment(&mut self, fragment: &str) -> Result<()> {
        let key = fragment.trim();
        let key = key.strip_prefix('#').unwrap_or(key);
        let key = key.strip_prefix('/').unwrap_or(key);
        self.navigate(key)
    }

    /// Key of the last successful navigation, empty before the first.
    pub fn current_key(&self) -> &str {
        &self.current
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn default_key(&self) -> &str {
        &self.default_key
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}
