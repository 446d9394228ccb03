use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, ChannelCategoryDto, SaveCategoryRequest, validation};

#[derive(Debug, Deserialize)]
pub struct ListCategoriesQuery {
    pub search: Option<String>,
}

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListCategoriesQuery>,
) -> Result<Json<ApiResponse<Vec<ChannelCategoryDto>>>, ApiError> {
    let categories = state
        .store()
        .list_channel_categories(query.search.as_deref())
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .into_iter()
        .map(|(c, channel_count)| ChannelCategoryDto {
            id: c.id,
            name: c.name,
            channel_count,
        })
        .collect();

    Ok(Json(ApiResponse::success(categories)))
}

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SaveCategoryRequest>,
) -> Result<Json<ApiResponse<ChannelCategoryDto>>, ApiError> {
    validation::validate_name("category name", &payload.name)?;

    if state
        .store()
        .channel_category_name_taken(&payload.name, None)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
    {
        return Err(ApiError::conflict("This category already exists"));
    }

    let category = state
        .store()
        .create_channel_category(&payload.name)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(ApiResponse::success(ChannelCategoryDto {
        id: category.id,
        name: category.name,
        channel_count: 0,
    })))
}

pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<SaveCategoryRequest>,
) -> Result<Json<ApiResponse<ChannelCategoryDto>>, ApiError> {
    validation::validate_name("category name", &payload.name)?;

    if state
        .store()
        .channel_category_name_taken(&payload.name, Some(id))
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
    {
        return Err(ApiError::conflict("This category already exists"));
    }

    let updated = state
        .store()
        .rename_channel_category(id, &payload.name)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Channel category", id))?;

    let channel_count = state
        .store()
        .list_channel_categories(None)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .into_iter()
        .find(|(c, _)| c.id == id)
        .map_or(0, |(_, count)| count);

    Ok(Json(ApiResponse::success(ChannelCategoryDto {
        id: updated.id,
        name: updated.name,
        channel_count,
    })))
}

pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let deleted = state
        .store()
        .delete_channel_category(id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    if !deleted {
        return Err(ApiError::not_found("Channel category", id));
    }

    Ok(Json(ApiResponse::success(())))
}
