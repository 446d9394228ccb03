use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, ApiResponse, AppState, PlaylistDto, SavePlaylistRequest, validation};

#[derive(Debug, Deserialize)]
pub struct ListPlaylistsQuery {
    pub search: Option<String>,
}

/// Playlists of the authenticated user within one category, newest first.
pub async fn list_playlists(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(category_id): Path<i32>,
    Query(query): Query<ListPlaylistsQuery>,
) -> Result<Json<ApiResponse<Vec<PlaylistDto>>>, ApiError> {
    state
        .store()
        .get_playlist_category(category_id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Playlist category", category_id))?;

    let playlists = state
        .store()
        .list_playlists_for_category(category_id, user.0.id, query.search.as_deref())
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .into_iter()
        .map(|(p, cats)| PlaylistDto::from_model(p, cats))
        .collect();

    Ok(Json(ApiResponse::success(playlists)))
}

pub async fn create_playlist(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<SavePlaylistRequest>,
) -> Result<Json<ApiResponse<PlaylistDto>>, ApiError> {
    validate_payload(&state, &payload).await?;

    if state
        .store()
        .playlist_url_taken(&payload.url, None)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
    {
        return Err(ApiError::conflict("This playlist is already registered"));
    }

    let playlist = state
        .store()
        .create_playlist(
            user.0.id,
            &payload.title,
            payload.description.as_deref(),
            &payload.url,
            &payload.categories,
        )
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let (playlist, categories) = state
        .store()
        .get_playlist_with_categories(playlist.id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::internal("Failed to fetch created playlist"))?;

    Ok(Json(ApiResponse::success(PlaylistDto::from_model(
        playlist, categories,
    ))))
}

pub async fn update_playlist(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<SavePlaylistRequest>,
) -> Result<Json<ApiResponse<PlaylistDto>>, ApiError> {
    let existing = state
        .store()
        .get_playlist(id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Playlist", id))?;

    if existing.user_id != user.0.id {
        return Err(ApiError::forbidden(
            "You do not have permission to modify this playlist",
        ));
    }

    validate_payload(&state, &payload).await?;

    if state
        .store()
        .playlist_url_taken(&payload.url, Some(id))
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
    {
        return Err(ApiError::conflict("This playlist is already registered"));
    }

    state
        .store()
        .update_playlist(
            id,
            &payload.title,
            payload.description.as_deref(),
            &payload.url,
            &payload.categories,
        )
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let (playlist, categories) = state
        .store()
        .get_playlist_with_categories(id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::internal("Failed to fetch updated playlist"))?;

    Ok(Json(ApiResponse::success(PlaylistDto::from_model(
        playlist, categories,
    ))))
}

pub async fn delete_playlist(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let existing = state
        .store()
        .get_playlist(id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Playlist", id))?;

    if existing.user_id != user.0.id {
        return Err(ApiError::forbidden(
            "You do not have permission to delete this playlist",
        ));
    }

    state
        .store()
        .delete_playlist(id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(ApiResponse::success(())))
}

async fn validate_payload(
    state: &Arc<AppState>,
    payload: &SavePlaylistRequest,
) -> Result<(), ApiError> {
    validation::validate_name("playlist title", &payload.title)?;
    validation::validate_description(payload.description.as_deref())?;
    validation::validate_playlist_url(&payload.url)?;
    validation::validate_category_selection(&payload.categories)?;

    for &category_id in &payload.categories {
        if state
            .store()
            .get_playlist_category(category_id)
            .await
            .map_err(|e| ApiError::internal(e.to_string()))?
            .is_none()
        {
            return Err(ApiError::validation(
                "One or more selected categories are not valid",
            ));
        }
    }

    Ok(())
}
