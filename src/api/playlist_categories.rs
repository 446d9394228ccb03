use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{
    ApiError, ApiResponse, AppState, PlaylistCategoryDto, PlaylistDto, SaveCategoryRequest,
    validation,
};
use crate::db::PlaylistSearchField;

#[derive(Debug, Deserialize)]
pub struct ListCategoriesQuery {
    pub search: Option<String>,
    pub playlist_search: Option<String>,
    pub playlist_field: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlaylistCategoryIndex {
    pub categories: Vec<PlaylistCategoryDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found_playlists: Option<Vec<PlaylistDto>>,
}

/// Category listing with counts, plus the global playlist search used by the
/// category overview page.
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ListCategoriesQuery>,
) -> Result<Json<ApiResponse<PlaylistCategoryIndex>>, ApiError> {
    let categories = state
        .store()
        .list_playlist_categories(query.search.as_deref())
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .into_iter()
        .map(|(c, playlist_count)| PlaylistCategoryDto {
            id: c.id,
            name: c.name,
            playlist_count,
        })
        .collect();

    let found_playlists = if let Some(term) = query.playlist_search.as_deref() {
        // Unknown field names fall back to searching titles.
        let field = match query.playlist_field.as_deref() {
            Some("description") => PlaylistSearchField::Description,
            _ => PlaylistSearchField::Title,
        };

        let matches = state
            .store()
            .search_playlists(user.0.id, field, term)
            .await
            .map_err(|e| ApiError::internal(e.to_string()))?
            .into_iter()
            .map(|(p, cats)| PlaylistDto::from_model(p, cats))
            .collect();

        Some(matches)
    } else {
        None
    };

    Ok(Json(ApiResponse::success(PlaylistCategoryIndex {
        categories,
        found_playlists,
    })))
}

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SaveCategoryRequest>,
) -> Result<Json<ApiResponse<PlaylistCategoryDto>>, ApiError> {
    validation::validate_name("category name", &payload.name)?;

    if state
        .store()
        .playlist_category_name_taken(&payload.name, None)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
    {
        return Err(ApiError::conflict("This category already exists"));
    }

    let category = state
        .store()
        .create_playlist_category(&payload.name)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(ApiResponse::success(PlaylistCategoryDto {
        id: category.id,
        name: category.name,
        playlist_count: 0,
    })))
}

pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<SaveCategoryRequest>,
) -> Result<Json<ApiResponse<PlaylistCategoryDto>>, ApiError> {
    validation::validate_name("category name", &payload.name)?;

    if state
        .store()
        .playlist_category_name_taken(&payload.name, Some(id))
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
    {
        return Err(ApiError::conflict("This category already exists"));
    }

    let updated = state
        .store()
        .rename_playlist_category(id, &payload.name)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Playlist category", id))?;

    let playlist_count = state
        .store()
        .list_playlist_categories(None)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .into_iter()
        .find(|(c, _)| c.id == id)
        .map_or(0, |(_, count)| count);

    Ok(Json(ApiResponse::success(PlaylistCategoryDto {
        id: updated.id,
        name: updated.name,
        playlist_count,
    })))
}

pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let deleted = state
        .store()
        .delete_playlist_category(id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    if !deleted {
        return Err(ApiError::not_found("Playlist category", id));
    }

    Ok(Json(ApiResponse::success(())))
}
