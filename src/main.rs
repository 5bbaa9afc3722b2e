//! SkinVault Backend
//!
//! A REST backend for a CS2 skin inventory tracker. Persistence runs
//! against SQLite when a database is configured and degrades to a local
//! JSON file store when it is not; the catalog layer caches and falls back
//! the same way. Call sites never see which mode is active.

mod api;
mod auth;
mod catalog;
mod config;
mod errors;
mod inventory;
mod models;
mod settings;
mod store;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::SessionStore;
use catalog::CatalogService;
use config::Config;
use inventory::Inventory;
use settings::Settings;
use store::{LocalFileBackend, StorageBackend};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn StorageBackend>,
    pub inventory: Arc<Inventory>,
    pub catalog: Arc<CatalogService>,
    pub settings: Settings,
    pub sessions: Arc<SessionStore>,
    pub fallback_mode: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting SkinVault Backend");
    tracing::info!("Data directory: {:?}", config.data_dir);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Decide the storage backend once, up front
    let (backend, fallback_mode) = store::select_backend(&config).await;

    let state = build_state(config.clone(), backend, fallback_mode);

    // Warm the catalog so first searches hit the cache
    let warm = Arc::clone(&state.catalog);
    tokio::spawn(async move {
        let entries = warm.fetch_all().await;
        tracing::info!("Catalog preloaded with {} entries", entries.len());
    });

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Wire the components together around the chosen backend. The local file
/// store is always constructed as well: it doubles as the resilience layer
/// under the database for inventory writes.
pub fn build_state(
    config: Config,
    backend: Arc<dyn StorageBackend>,
    fallback_mode: bool,
) -> AppState {
    let local = Arc::new(LocalFileBackend::new(&config.data_dir));
    let settings = Settings::new(Arc::clone(&backend));
    let catalog = Arc::new(CatalogService::new(Arc::clone(&backend), settings.clone()));
    let inventory = Arc::new(Inventory::new(
        Arc::clone(&backend),
        local,
        Arc::clone(&catalog),
    ));

    AppState {
        backend,
        inventory,
        catalog,
        settings,
        sessions: Arc::new(SessionStore::new()),
        fallback_mode,
    }
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone the session store for the auth layer
    let sessions = Arc::clone(&state.sessions);

    // Routes requiring a session
    let session_routes = Router::new()
        // Auth
        .route("/auth/me", get(api::me))
        .route("/auth/steam", post(api::link_steam))
        .route("/auth/logout", post(api::logout))
        // Catalog
        .route("/catalog/search", get(api::search_catalog))
        .route("/catalog/find", get(api::find_catalog_entry))
        .route("/catalog/refresh", post(api::refresh_catalog))
        .route("/catalog/export", get(api::export_catalog))
        // Inventory
        .route("/inventory", get(api::list_items))
        .route("/inventory", post(api::add_item))
        .route("/inventory/{id}", delete(api::delete_item))
        .route("/inventory/steam", get(api::steam_inventory))
        .route("/inventory/export", get(api::export_inventory))
        // Settings (admin surface)
        .route("/settings/{key}", get(api::get_setting))
        .route("/settings/{key}", put(api::put_setting))
        // Apply session auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::session_auth_layer(sessions.clone(), req, next)
        }));

    // Public routes
    let public_routes = Router::new()
        .route("/auth/register", post(api::register))
        .route("/auth/login", post(api::login))
        .route("/status", get(api::get_status));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", session_routes.merge(public_routes))
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
