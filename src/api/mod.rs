use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;

pub mod auth;
mod channel_categories;
mod channels;
mod error;
mod playlist_categories;
mod playlists;
mod system;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use tokio::sync::RwLock;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub start_time: std::time::Instant,
}

impl AppState {
    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    ensure_bootstrap_user(&store).await?;

    Ok(Arc::new(AppState {
        config: Arc::new(RwLock::new(config)),
        store,
        start_time: std::time::Instant::now(),
    }))
}

/// Creates the initial admin account when the users table is empty. The
/// importer never does this itself; it refuses to run without an owner.
async fn ensure_bootstrap_user(store: &Store) -> anyhow::Result<()> {
    if store.user_count().await? > 0 {
        return Ok(());
    }

    let user = store.create_user("admin", "password").await?;
    info!(
        "Bootstrap user 'admin' created (default password 'password', API key {})",
        user.api_key
    );

    Ok(())
}

pub async fn router(state: Arc<AppState>) -> Router {
    let cors_origins = {
        let config = state.config.read().await;
        config.server.cors_allowed_origins.clone()
    };

    let protected_routes = Router::new()
        .route(
            "/playlist-categories",
            get(playlist_categories::list_categories).post(playlist_categories::create_category),
        )
        .route(
            "/playlist-categories/{id}",
            put(playlist_categories::update_category).delete(playlist_categories::delete_category),
        )
        .route(
            "/playlist-categories/{id}/playlists",
            get(playlists::list_playlists),
        )
        .route("/playlists", post(playlists::create_playlist))
        .route(
            "/playlists/{id}",
            put(playlists::update_playlist).delete(playlists::delete_playlist),
        )
        .route(
            "/channel-categories",
            get(channel_categories::list_categories).post(channel_categories::create_category),
        )
        .route(
            "/channel-categories/{id}",
            put(channel_categories::update_category).delete(channel_categories::delete_category),
        )
        .route(
            "/channel-categories/{id}/channels",
            get(channels::list_channels),
        )
        .route("/channels", post(channels::create_channel))
        .route(
            "/channels/{id}",
            put(channels::update_channel).delete(channels::delete_channel),
        )
        .route("/system/status", get(system::status))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    let api_router = Router::new().merge(protected_routes).with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
