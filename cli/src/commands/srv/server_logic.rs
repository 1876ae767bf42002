//! # Starsite Server Logic
//!
//! File: cli/src/commands/srv/server_logic.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The Axum application behind `starsite srv`. The browser loads the page
//! shell from `/`; on every `hashchange` the shell fetches `/views/{key}`,
//! which runs the site's `ViewRouter` and returns the rendered view with the
//! resolved route in the `x-route` header. The interactive parts of each
//! view talk to the JSON API.
//!
//! | method | path                  | purpose                                |
//! |--------|-----------------------|----------------------------------------|
//! | GET    | `/`                   | page shell with navigation             |
//! | GET    | `/views/`, `/views/{key}` | one rendered view                  |
//! | GET    | `/api/greeting`       | the bot's welcome text                 |
//! | GET    | `/api/conversation`   | persisted conversation                 |
//! | POST   | `/api/chat`           | submit a message, get the bot's reply  |
//! | GET    | `/api/planets`        | simulator destinations                 |
//! | POST   | `/api/travel`         | validate, remember and compute a trip  |
//! | POST   | `/api/button/press`   | press the talking button               |
//! | POST   | `/api/button/reset`   | reset its counter                      |
//!
//! Shared state sits behind `std::sync::Mutex`; no handler holds a guard
//! across an `.await`.
//!
use super::config::ServerConfig;
use crate::commands::open_store;
use anyhow::Context;
use axum::extract::{Path, State};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use starsite::button::Press;
use starsite::chatbot::{self, ChatWidget, ConversationEntry, ResponseMatcher, Sender};
use starsite::common::store::{FileStore, SharedStore};
use starsite::core::config::Config;
use starsite::core::error::{Result, StarsiteError};
use starsite::core::templating::Views;
use starsite::router::{CapturedSurface, ViewRouter};
use starsite::simulator::{self, TravelPreferences, TravelResult};
use starsite::site::{self, SiteContext};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

/// Header carrying the route a `/views/` request resolved to.
pub const ROUTE_HEADER: HeaderName = HeaderName::from_static("x-route");

type SiteRouter = ViewRouter<String, CapturedSurface<String>>;

/// Everything the handlers share.
pub struct AppState {
    site: Arc<SiteContext>,
    views: Mutex<SiteRouter>,
    chat: Mutex<ChatWidget<SharedStore<FileStore>>>,
    store: SharedStore<FileStore>,
    typing_delay_ms: u64,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Loads responses and planets, opens the store and restores (or
    /// greets) the chat conversation.
    pub async fn load(cfg: &Config) -> Result<Self> {
        let matcher = chatbot::load_matcher(std::path::Path::new(&cfg.chatbot.responses)).await;
        let planets =
            simulator::load_planets_or_empty(std::path::Path::new(&cfg.simulator.planets)).await;
        let store = open_store(cfg)?;
        let preferences = TravelPreferences::load(&store);
        let site = Arc::new(SiteContext::new(Views::new()?, planets, preferences));
        Self::new(site, matcher, store, cfg.chatbot.typing_delay_ms)
    }

    pub fn new(
        site: Arc<SiteContext>,
        matcher: ResponseMatcher,
        store: FileStore,
        typing_delay_ms: u64,
    ) -> Result<Self> {
        let store = SharedStore::new(store);
        let mut chat = ChatWidget::new(matcher, store.clone());
        let restored = chat.start()?.len();
        info!("Chat ready with {} messages", restored);
        Ok(Self {
            views: Mutex::new(site::build_router(Arc::clone(&site), CapturedSurface::default())),
            site,
            chat: Mutex::new(chat),
            store,
            typing_delay_ms,
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs the server until Ctrl+C or SIGTERM.
pub async fn run_server(config: ServerConfig, cfg: &Config) -> Result<()> {
    let max_port_attempts = 10;
    let addr = find_available_port(config.host, config.port, max_port_attempts).await?;

    let state = Arc::new(AppState::load(cfg).await?);
    let app = create_app(state, config.enable_cors);

    println!("\n=================================================================");
    println!("✨ Starsite");
    println!("🌐 Local URL:         http://localhost:{}", addr.port());
    println!("⚙️  Binding to address: {}", addr);
    println!("💬 Responses:         {}", cfg.chatbot.responses);
    println!("🪐 Planets:           {}", cfg.simulator.planets);
    println!("💾 Storage:           {}", cfg.storage.path);
    println!("🔒 CORS enabled:      {}", config.enable_cors);
    println!("=================================================================\n");

    info!("Starting server on {}", addr);
    println!("Server starting! Press Ctrl+C to stop.");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    println!("\nServer shutdown complete.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, initiating graceful shutdown...");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!(
                    "Failed to install SIGTERM handler: {}. Shutdown on SIGTERM might not work.",
                    e
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

async fn find_available_port(
    req_host: std::net::IpAddr,
    start_port: u16,
    max_attempts: u8,
) -> Result<SocketAddr> {
    let mut current_port = start_port;

    for attempt in 0..max_attempts {
        let addr = SocketAddr::new(req_host, current_port);
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                drop(listener);
                if attempt > 0 {
                    info!(
                        "Port {} was unavailable, using available port {}.",
                        start_port, current_port
                    );
                }
                return Ok(addr);
            }
            Err(e) => {
                warn!(
                    "Attempt {}: Port {} on host {} is unavailable ({}). Trying next port...",
                    attempt + 1,
                    current_port,
                    req_host,
                    e
                );
                current_port = current_port.checked_add(1).with_context(|| {
                    format!("No ports left above {} on host {}", current_port, req_host)
                })?;
            }
        }
    }

    anyhow::bail!(
        "Could not find an available port on host {} starting from port {} after trying {} ports.",
        req_host,
        start_port,
        max_attempts
    )
}

/// Builds the application router with tracing and (optionally) CORS.
pub fn create_app(state: SharedState, enable_cors: bool) -> Router {
    let cors_layer = if enable_cors {
        info!("CORS middleware enabled (permissive).");
        CorsLayer::permissive()
    } else {
        info!("CORS middleware disabled.");
        CorsLayer::new()
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(true))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/", get(shell))
        .route("/views/", get(default_view))
        .route("/views/{key}", get(view))
        .route("/api/greeting", get(greeting))
        .route("/api/conversation", get(conversation))
        .route("/api/chat", post(chat))
        .route("/api/planets", get(planets))
        .route("/api/travel", post(travel))
        .route("/api/button/press", post(press_button))
        .route("/api/button/reset", post(reset_button))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(trace_layer).layer(cors_layer))
}

// ============================================================
// Handlers
// ============================================================

async fn shell(State(state): State<SharedState>) -> std::result::Result<Html<String>, ApiError> {
    Ok(Html(state.site.render_shell()?))
}

async fn default_view(State(state): State<SharedState>) -> std::result::Result<Response, ApiError> {
    render_view(&state, "")
}

async fn view(
    State(state): State<SharedState>,
    Path(key): Path<String>,
) -> std::result::Result<Response, ApiError> {
    render_view(&state, &key)
}

fn render_view(state: &AppState, fragment: &str) -> std::result::Result<Response, ApiError> {
    let mut router = lock(&state.views);
    router.navigate_fragment(fragment)?;
    let html = router
        .surface()
        .last()
        .map(|(_, html)| html.clone())
        .unwrap_or_default();
    let route = HeaderValue::from_str(router.current_key())
        .map_err(|e| ApiError::internal(format!("invalid route header: {}", e)))?;

    let mut response = Html(html).into_response();
    response.headers_mut().insert(ROUTE_HEADER, route);
    Ok(response)
}

#[derive(Serialize)]
struct GreetingResponse {
    greeting: String,
}

async fn greeting(State(state): State<SharedState>) -> Json<GreetingResponse> {
    let greeting = lock(&state.chat).matcher().greeting();
    Json(GreetingResponse { greeting })
}

async fn conversation(State(state): State<SharedState>) -> Json<Vec<ConversationEntry>> {
    Json(lock(&state.chat).conversation().entries().to_vec())
}

#[derive(Deserialize)]
struct ChatRequest {
    text: String,
}

#[derive(Serialize)]
struct ChatResponse {
    reply: Option<String>,
    typing_delay_ms: u64,
}

async fn chat(
    State(state): State<SharedState>,
    Json(request): Json<ChatRequest>,
) -> std::result::Result<Json<ChatResponse>, ApiError> {
    let mut widget = lock(&state.chat);
    let reply = widget.submit(&request.text)?;
    // The browser delays showing the reply; the conversation records it now.
    if let Some(reply) = &reply {
        widget.display(reply, Sender::Bot)?;
    }
    Ok(Json(ChatResponse {
        reply,
        typing_delay_ms: state.typing_delay_ms,
    }))
}

async fn planets(State(state): State<SharedState>) -> Json<Vec<simulator::Planet>> {
    Json(state.site.planets().to_vec())
}

#[derive(Deserialize)]
struct TravelRequest {
    distance: f64,
    speed: f64,
}

async fn travel(
    State(state): State<SharedState>,
    Json(request): Json<TravelRequest>,
) -> std::result::Result<Json<TravelResult>, ApiError> {
    let mut store = state.store.clone();
    let result = simulator::submit(&mut store, request.distance, request.speed)?;
    state.site.set_preferences(TravelPreferences {
        distance: Some(result.distance),
        speed: Some(result.speed),
    });
    Ok(Json(result))
}

async fn press_button(State(state): State<SharedState>) -> Json<Press> {
    let press = state.site.button().press(&mut rand::thread_rng());
    Json(press)
}

async fn reset_button(State(state): State<SharedState>) -> Json<serde_json::Value> {
    let mut button = state.site.button();
    button.reset();
    Json(json!({ "count": button.press_count() }))
}

// ============================================================
// Error Handling
// ============================================================

/// Handler error rendered as `{ "error": message }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        let status = match err.downcast_ref::<StarsiteError>() {
            Some(e) if e.is_validation() => StatusCode::UNPROCESSABLE_ENTITY,
            Some(StarsiteError::RouteNotFound { .. }) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Request failed: {:#}", err);
        } else {
            warn!("Rejected request: {:#}", err);
        }
        Self {
            status,
            message: format!("{:#}", err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use starsite::chatbot::ResponseTable;
    use starsite::common::store::KeyValueStore;
    use starsite::simulator::Planet;
    use std::net::Ipv4Addr;
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct Fixture {
        _dir: TempDir,
        storage: std::path::PathBuf,
        app: Router,
    }

    fn fixture() -> Result<Fixture> {
        let dir = TempDir::new()?;
        let storage = dir.path().join("storage.json");
        let planets = vec![Planet {
            name: "Proxima b".into(),
            distance: 4.24,
        }];
        let site = Arc::new(SiteContext::new(
            Views::new()?,
            planets,
            TravelPreferences::default(),
        ));
        let matcher = ResponseMatcher::new(ResponseTable::from_pairs([
            ("welcome", "¡Bienvenido a bordo!"),
            ("hola", "¡Hola, viajero!"),
            ("default", "No sé de eso."),
        ]));
        let state = AppState::new(site, matcher, FileStore::open(&storage)?, 0)?;
        Ok(Fixture {
            _dir: dir,
            storage,
            app: create_app(Arc::new(state), true),
        })
    }

    async fn body_string(response: Response) -> Result<String> {
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Result<Request<Body>> {
        Ok(Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))?)
    }

    #[tokio::test]
    async fn test_find_available_port_start_is_free() -> Result<()> {
        let host = Ipv4Addr::LOCALHOST.into();
        let addr = find_available_port(host, 50000, 5).await?;
        assert_eq!(addr.port(), 50000);
        assert_eq!(addr.ip(), host);
        Ok(())
    }

    #[tokio::test]
    async fn test_find_available_port_start_occupied() -> Result<()> {
        let host = Ipv4Addr::LOCALHOST.into();
        let start_port = 51000;
        let _listener = TcpListener::bind(SocketAddr::new(host, start_port)).await?;

        let addr = find_available_port(host, start_port, 5).await?;
        assert!(addr.port() > start_port);
        assert!(addr.port() < start_port + 5);
        Ok(())
    }

    #[tokio::test]
    async fn test_shell_links_routes() -> Result<()> {
        let fx = fixture()?;
        let response = fx
            .app
            .oneshot(Request::builder().uri("/").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await?.contains(r##"href="#simulator""##));
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_view_falls_back_to_home() -> Result<()> {
        let fx = fixture()?;
        let response = fx
            .app
            .oneshot(Request::builder().uri("/views/contact").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(&ROUTE_HEADER).map(|v| v.as_bytes()), Some(&b"home"[..]));
        assert!(body_string(response).await?.contains("Bienvenido"));
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_view_key_is_home() -> Result<()> {
        let fx = fixture()?;
        let response = fx
            .app
            .oneshot(Request::builder().uri("/views/").body(Body::empty())?)
            .await?;
        assert_eq!(response.headers().get(&ROUTE_HEADER).map(|v| v.as_bytes()), Some(&b"home"[..]));
        Ok(())
    }

    #[tokio::test]
    async fn test_greeting_uses_welcome_entry() -> Result<()> {
        let fx = fixture()?;
        let response = fx
            .app
            .oneshot(Request::builder().uri("/api/greeting").body(Body::empty())?)
            .await?;
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await?)?;
        assert_eq!(body["greeting"], "¡Bienvenido a bordo!");
        Ok(())
    }

    #[tokio::test]
    async fn test_chat_replies_and_persists() -> Result<()> {
        let fx = fixture()?;
        let response = fx
            .app
            .clone()
            .oneshot(post_json("/api/chat", json!({ "text": "HOLA a todos" }))?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await?)?;
        assert_eq!(body["reply"], "¡Hola, viajero!");

        let response = fx
            .app
            .oneshot(Request::builder().uri("/api/conversation").body(Body::empty())?)
            .await?;
        let entries: serde_json::Value = serde_json::from_str(&body_string(response).await?)?;
        // greeting, user message, reply
        assert_eq!(entries.as_array().map(Vec::len), Some(3));
        assert_eq!(entries[1]["sender"], "user");
        assert_eq!(entries[2]["text"], "¡Hola, viajero!");

        let saved = FileStore::open(&fx.storage)?;
        assert!(saved.get("chatbotConversation").is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_blank_chat_message_has_no_reply() -> Result<()> {
        let fx = fixture()?;
        let response = fx
            .app
            .oneshot(post_json("/api/chat", json!({ "text": "   " }))?)
            .await?;
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await?)?;
        assert!(body["reply"].is_null());
        Ok(())
    }

    #[tokio::test]
    async fn test_travel_computes_and_remembers() -> Result<()> {
        let fx = fixture()?;
        let response = fx
            .app
            .clone()
            .oneshot(post_json("/api/travel", json!({ "distance": 10.0, "speed": 50.0 }))?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await?)?;
        assert_eq!(body["formatted"], "20.00");

        let saved = FileStore::open(&fx.storage)?;
        assert_eq!(saved.get("lastDistance").as_deref(), Some("10"));
        assert_eq!(saved.get("lastSpeed").as_deref(), Some("50"));

        let response = fx
            .app
            .oneshot(Request::builder().uri("/views/simulator").body(Body::empty())?)
            .await?;
        assert!(body_string(response).await?.contains(r#"id="speed" name="speed" type="number" step="any" value="50"#));
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_travel_is_unprocessable_and_not_saved() -> Result<()> {
        let fx = fixture()?;
        let response = fx
            .app
            .oneshot(post_json("/api/travel", json!({ "distance": -1.0, "speed": 50.0 }))?)
            .await?;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await?)?;
        assert!(body["error"].as_str().unwrap_or_default().contains("distancia"));

        let saved = FileStore::open(&fx.storage)?;
        assert_eq!(saved.get("lastDistance"), None);
        Ok(())
    }

    #[tokio::test]
    async fn test_planets_listed_in_order() -> Result<()> {
        let fx = fixture()?;
        let response = fx
            .app
            .oneshot(Request::builder().uri("/api/planets").body(Body::empty())?)
            .await?;
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await?)?;
        assert_eq!(body[0]["name"], "Proxima b");
        Ok(())
    }

    #[tokio::test]
    async fn test_button_offers_reset_on_third_press() -> Result<()> {
        let fx = fixture()?;
        let mut last = serde_json::Value::Null;
        for _ in 0..3 {
            let response = fx
                .app
                .clone()
                .oneshot(post_json("/api/button/press", serde_json::Value::Null)?)
                .await?;
            last = serde_json::from_str(&body_string(response).await?)?;
        }
        assert_eq!(last["count"], 3);
        assert_eq!(last["event"]["kind"], "offer_reset");

        let response = fx
            .app
            .oneshot(post_json("/api/button/reset", serde_json::Value::Null)?)
            .await?;
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await?)?;
        assert_eq!(body["count"], 0);
        Ok(())
    }
}
