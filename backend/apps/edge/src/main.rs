//! Edge Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use auth::{
    AuthContext, HttpAuthBackend, RelayAppState, RelayConfig, protected_pages, relay_routes,
};
use axum::{
    Extension, Json, Router,
    http::{HeaderName, HeaderValue, Method, header},
    routing::get,
};
use serde_json::{Value, json};
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "edge=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RelayConfig::from_env()?;

    tracing::info!(
        mode = config.mode.as_str(),
        backend = %config.urls.backend_base(),
        frontend = %config.urls.frontend_base(),
        timeout_secs = config.backend_timeout.as_secs(),
        "Relay configured"
    );

    // CORS: the frontend origin only, with credentials
    let frontend_origin = HeaderValue::from_str(&config.urls.frontend_origin())?;
    let cors = CorsLayer::new()
        .allow_origin(frontend_origin)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-requested-with"),
            config.csrf_header_name.clone(),
        ]))
        .allow_credentials(true);

    let backend = HttpAuthBackend::from_config(&config)?;
    let state = RelayAppState::new(backend, config);

    // Pages that need a signed-in user
    let pages = Router::new().route("/dashboard", get(dashboard));

    // Build router
    let app = Router::new()
        .nest("/auth", relay_routes(state.clone()))
        .merge(protected_pages(pages, state))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = env::var("LISTEN_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:5010".to_string())
        .parse()
        .map_err(AppError::from)?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// GET /dashboard
async fn dashboard(Extension(auth): Extension<AuthContext>) -> Json<Value> {
    Json(json!({
        "page": "dashboard",
        "auth": auth,
    }))
}
