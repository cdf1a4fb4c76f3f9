mod config;
mod error;
mod guardrails;
mod models;
mod routes;
mod services;

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::http::header;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Settings;
use services::generation::GenerationService;

pub struct AppState {
    pub settings: Settings,
    pub start_time: Instant,
    pub generation: GenerationService,
}

#[tokio::main]
async fn main() {
    // Load .env file
    dotenvy::dotenv().ok();

    let settings = Settings::from_env();
    init_tracing(&settings);

    tracing::info!(
        app = %settings.app_name,
        version = %settings.app_version,
        "Starting server"
    );

    // Shared HTTP client for the generation backend
    let http_client = reqwest::Client::new();

    // The backend itself initializes lazily on the first chat request.
    let generation = GenerationService::new(settings.clone(), http_client);

    let state = Arc::new(AppState {
        settings: settings.clone(),
        start_time: Instant::now(),
        generation,
    });

    let cors = build_cors(&settings);

    use axum::routing::{get, post};
    use routes::{chat, health};

    let app = Router::new()
        // Health
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/status", get(health::status))
        // Chat
        .route("/chat", post(chat::chat))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
        .merge(routes::openapi::swagger_ui());

    let addr = format!("{}:{}", settings.host, settings.port);
    tracing::info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server error");
}

fn init_tracing(settings: &Settings) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    if settings.log_format == "json" {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .init();
    } else {
        fmt().with_env_filter(filter).with_target(true).init();
    }
}

fn build_cors(settings: &Settings) -> CorsLayer {
    let origins = settings.cors_origins_list();

    if origins.contains(&"*".to_string()) {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let allowed: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        use axum::http::Method;
        CorsLayer::new()
            .allow_origin(allowed)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([
                header::AUTHORIZATION,
                header::CONTENT_TYPE,
                header::ACCEPT,
                header::ORIGIN,
            ])
            .allow_credentials(true)
    }
}
