use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, SystemStatus};

pub async fn status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SystemStatus>>, ApiError> {
    let store = state.store();

    let status = SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.start_time.elapsed().as_secs(),
        playlists: store
            .playlist_count()
            .await
            .map_err(|e| ApiError::internal(e.to_string()))?,
        playlist_categories: store
            .playlist_category_count()
            .await
            .map_err(|e| ApiError::internal(e.to_string()))?,
        channels: store
            .channel_count()
            .await
            .map_err(|e| ApiError::internal(e.to_string()))?,
        channel_categories: store
            .channel_category_count()
            .await
            .map_err(|e| ApiError::internal(e.to_string()))?,
    };

    Ok(Json(ApiResponse::success(status)))
}
