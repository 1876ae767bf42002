//! # Starsite Site Views
//!
//! File: cli/src/site/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The single-page starfield site: its route table and the state its views
//! read. `SiteContext` is the one owner of that state (planet list,
//! remembered simulator values, the talking button) and is shared by the
//! router's render functions and the HTTP handlers.
//!
//! | key         | view                                   |
//! |-------------|----------------------------------------|
//! | `home`      | landing page (default route)           |
//! | `about`     | about page                             |
//! | `simulator` | travel form with planet options        |
//! | `chat`      | chatbot widget container               |
//! | `button`    | talking button and its press counter   |
//!
use crate::button::TalkingButton;
use crate::core::error::Result;
use crate::core::templating::Views;
use crate::router::{Surface, ViewRouter};
use crate::simulator::{Planet, TravelPreferences};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// Route keys in navigation order.
pub const ROUTES: [&str; 5] = ["home", "about", "simulator", "chat", "button"];
/// Route shown for empty or unknown fragments.
pub const DEFAULT_ROUTE: &str = "home";

const SITE_TITLE: &str = "Starsite";

/// State read by the site's views.
pub struct SiteContext {
    views: Views,
    planets: Vec<Planet>,
    preferences: Mutex<TravelPreferences>,
    button: Mutex<TalkingButton>,
}

impl SiteContext {
    pub fn new(views: Views, planets: Vec<Planet>, preferences: TravelPreferences) -> Self {
        Self {
            views,
            planets,
            preferences: Mutex::new(preferences),
            button: Mutex::new(TalkingButton::default()),
        }
    }

    pub fn planets(&self) -> &[Planet] {
        &self.planets
    }

    pub fn preferences(&self) -> TravelPreferences {
        *lock(&self.preferences)
    }

    pub fn set_preferences(&self, preferences: TravelPreferences) {
        *lock(&self.preferences) = preferences;
    }

    /// Exclusive access to the talking button.
    pub fn button(&self) -> MutexGuard<'_, TalkingButton> {
        lock(&self.button)
    }

    /// Renders the full page shell with navigation links.
    pub fn render_shell(&self) -> Result<String> {
        let mut context = tera::Context::new();
        context.insert("title", SITE_TITLE);
        context.insert("links", &ROUTES);
        self.views.render("shell", &context)
    }

    fn render_simulator(&self) -> Result<String> {
        let preferences = self.preferences();
        let mut context = tera::Context::new();
        context.insert("planets", &self.planets);
        context.insert("distance", &preferences.distance);
        context.insert("speed", &preferences.speed);
        self.views.render("simulator", &context)
    }

    fn render_button(&self) -> Result<String> {
        let mut context = tera::Context::new();
        context.insert("press_count", &self.button().press_count());
        self.views.render("button", &context)
    }

    fn render_static(&self, name: &str) -> Result<String> {
        self.views.render(name, &tera::Context::new())
    }
}

// A poisoned lock only means a panic happened mid-update; the values are
// plain data and stay usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Registers every site route on a new router with `home` as default.
pub fn build_router<S: Surface<String>>(
    context: Arc<SiteContext>,
    surface: S,
) -> ViewRouter<String, S> {
    let mut router = ViewRouter::new(surface).with_default(DEFAULT_ROUTE);

    for key in ["home", "about", "chat"] {
        let ctx = Arc::clone(&context);
        router.register(key, move || ctx.render_static(key));
    }

    let ctx = Arc::clone(&context);
    let planet_count = context.planets().len();
    router.register_with_attach(
        "simulator",
        move || ctx.render_simulator(),
        move |_html: &String| {
            if planet_count == 0 {
                warn!("Simulator attached without planet options; distance must be entered manually");
            } else {
                debug!("Simulator attached with {} planet options", planet_count);
            }
        },
    );

    let ctx = Arc::clone(&context);
    router.register("button", move || ctx.render_button());

    router
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::CapturedSurface;

    fn context(planets: Vec<Planet>, preferences: TravelPreferences) -> Arc<SiteContext> {
        Arc::new(SiteContext::new(Views::new().unwrap(), planets, preferences))
    }

    fn last_html(router: &ViewRouter<String, CapturedSurface<String>>) -> String {
        router.surface().last().map(|(_, html)| html.clone()).unwrap_or_default()
    }

    #[test]
    fn test_all_routes_registered() {
        let router = build_router(context(vec![], TravelPreferences::default()), CapturedSurface::default());
        let mut expected = ROUTES.to_vec();
        expected.sort_unstable();
        assert_eq!(router.keys(), expected);
    }

    #[test]
    fn test_unknown_fragment_shows_home() -> Result<()> {
        let mut router = build_router(context(vec![], TravelPreferences::default()), CapturedSurface::default());
        router.navigate_fragment("#contact")?;
        assert_eq!(router.current_key(), "home");
        assert!(last_html(&router).contains("Bienvenido"));
        Ok(())
    }

    #[test]
    fn test_simulator_lists_planets_and_prefills() -> Result<()> {
        let planets = vec![Planet {
            name: "Proxima b".into(),
            distance: 4.24,
        }];
        let prefs = TravelPreferences {
            distance: Some(12.5),
            speed: Some(50.0),
        };
        let mut router = build_router(context(planets, prefs), CapturedSurface::default());
        router.navigate("simulator")?;

        let html = last_html(&router);
        assert!(html.contains("Proxima b"));
        assert!(html.contains(r#"value="4.24""#));
        assert!(html.contains(r#"value="12.5""#));
        Ok(())
    }

    #[test]
    fn test_simulator_renders_without_planets() -> Result<()> {
        let mut router = build_router(context(vec![], TravelPreferences::default()), CapturedSurface::default());
        router.navigate("simulator")?;
        assert!(last_html(&router).contains("Distancia manual"));
        Ok(())
    }

    #[test]
    fn test_button_view_reflects_press_count() -> Result<()> {
        let ctx = context(vec![], TravelPreferences::default());
        let mut router = build_router(Arc::clone(&ctx), CapturedSurface::default());
        ctx.button().press(&mut rand::thread_rng());
        router.navigate("button")?;
        assert!(last_html(&router).contains(r#"<span id="press-count">1</span>"#));
        Ok(())
    }

    #[test]
    fn test_shell_links_every_route() -> Result<()> {
        let html = context(vec![], TravelPreferences::default()).render_shell()?;
        for key in ROUTES {
            assert!(html.contains(&format!("href=\"#{}\"", key)));
        }
        Ok(())
    }
}
