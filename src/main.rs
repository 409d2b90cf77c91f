//! Atlas Backend
//!
//! Storytelling platform: parallax stories built from blocks, news, a world
//! catalog and an author dashboard, over SQLite with a live change feed.

mod api;
mod assistant;
mod auth;
mod config;
mod db;
mod editor;
mod errors;
mod listing;
mod media;
mod models;
mod reader;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use assistant::{Assistant, TextAssistant};
use config::Config;
use db::Repository;
use media::{LocalMediaStore, MediaStore, UPLOADS_URL_PREFIX};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub media: Arc<dyn MediaStore>,
    pub assistant: Arc<dyn TextAssistant>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Atlas Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Upload directory: {:?}", config.upload_dir);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if PSK is not configured
    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (ATLAS_API_PSK). Author routes are open!");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    let media = Arc::new(LocalMediaStore::new(
        config.upload_dir.clone(),
        UPLOADS_URL_PREFIX,
    ));

    let assistant = Assistant::from_config(&config);
    tracing::info!("AI assistant configured: {}", assistant.is_configured());
    let assistant = Arc::new(assistant);

    let state = AppState {
        repo,
        media,
        assistant,
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone PSK for the auth layer
    let psk = state.config.api_psk.clone();

    // Reader-facing routes (no auth required)
    let public_routes = Router::new()
        .route("/library", get(api::get_library))
        .route("/archive", get(api::get_archive))
        .route("/stories/{id}/read", get(api::read_story))
        .route("/news", get(api::list_news))
        .route("/news/{id}", get(api::get_news))
        .route("/cities", get(api::list_cities))
        .route("/cities/{id}", get(api::get_city))
        .route("/pages/library", get(api::get_library_page))
        .route("/events", get(api::stream_events));

    // Author routes
    let author_routes = Router::new()
        // Datastore
        .route("/datastore", get(api::get_datastore))
        .route("/datastore/revision", get(api::get_revision))
        .route("/dashboard", get(api::get_dashboard))
        // Stories
        .route("/stories", post(api::create_story))
        .route(
            "/stories/{id}",
            get(api::get_story)
                .put(api::update_story)
                .delete(api::delete_story),
        )
        .route("/stories/{id}/cover", delete(api::remove_cover))
        .route("/stories/{id}/uploads", post(api::upload_story_media))
        // Blocks
        .route("/stories/{id}/blocks/text", post(api::add_text_block))
        .route("/stories/{id}/blocks/image", post(api::add_image_block))
        .route("/stories/{id}/blocks/move", post(api::move_block))
        .route(
            "/stories/{id}/blocks/{block_id}",
            patch(api::update_block).delete(api::delete_block),
        )
        .route(
            "/stories/{id}/blocks/{block_id}/enhance",
            post(api::enhance_block),
        )
        // News
        .route("/news", post(api::create_news))
        .route(
            "/news/{id}",
            put(api::update_news).delete(api::delete_news),
        )
        // Cities
        .route("/cities", post(api::create_city))
        .route(
            "/cities/{id}",
            put(api::update_city).delete(api::delete_city),
        )
        // Pages
        .route("/pages/library", put(api::update_library_page))
        // Uploads
        .route("/uploads", post(api::upload_media))
        // Assistant
        .route("/assistant/ideas", post(api::story_ideas))
        .route("/assistant/enhance", post(api::enhance_text))
        .layer(DefaultBodyLimit::max(api::MAX_UPLOAD_BYTES))
        // Apply PSK auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    let uploads = ServeDir::new(&state.config.upload_dir);

    Router::new()
        .nest("/api", public_routes.merge(author_routes))
        .nest_service(UPLOADS_URL_PREFIX, uploads)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
