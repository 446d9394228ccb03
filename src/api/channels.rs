use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, ApiResponse, AppState, ChannelDto, SaveChannelRequest, validation};

#[derive(Debug, Deserialize)]
pub struct ListChannelsQuery {
    pub search: Option<String>,
}

/// Channels of the authenticated user within one category, newest first.
pub async fn list_channels(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(category_id): Path<i32>,
    Query(query): Query<ListChannelsQuery>,
) -> Result<Json<ApiResponse<Vec<ChannelDto>>>, ApiError> {
    state
        .store()
        .get_channel_category(category_id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Channel category", category_id))?;

    let channels = state
        .store()
        .list_channels_for_category(category_id, user.0.id, query.search.as_deref())
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .into_iter()
        .map(|(c, cats)| ChannelDto::from_model(c, cats))
        .collect();

    Ok(Json(ApiResponse::success(channels)))
}

pub async fn create_channel(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<SaveChannelRequest>,
) -> Result<Json<ApiResponse<ChannelDto>>, ApiError> {
    validate_payload(&state, &payload).await?;

    if state
        .store()
        .channel_url_taken(&payload.url, None)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
    {
        return Err(ApiError::conflict("This channel is already registered"));
    }

    let channel = state
        .store()
        .create_channel(
            user.0.id,
            &payload.name,
            payload.description.as_deref(),
            &payload.url,
            &payload.categories,
        )
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let (channel, categories) = state
        .store()
        .get_channel_with_categories(channel.id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::internal("Failed to fetch created channel"))?;

    Ok(Json(ApiResponse::success(ChannelDto::from_model(
        channel, categories,
    ))))
}

pub async fn update_channel(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<SaveChannelRequest>,
) -> Result<Json<ApiResponse<ChannelDto>>, ApiError> {
    let existing = state
        .store()
        .get_channel(id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Channel", id))?;

    if existing.user_id != user.0.id {
        return Err(ApiError::forbidden(
            "You do not have permission to modify this channel",
        ));
    }

    validate_payload(&state, &payload).await?;

    if state
        .store()
        .channel_url_taken(&payload.url, Some(id))
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
    {
        return Err(ApiError::conflict("This channel is already registered"));
    }

    state
        .store()
        .update_channel(
            id,
            &payload.name,
            payload.description.as_deref(),
            &payload.url,
            &payload.categories,
        )
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    let (channel, categories) = state
        .store()
        .get_channel_with_categories(id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::internal("Failed to fetch updated channel"))?;

    Ok(Json(ApiResponse::success(ChannelDto::from_model(
        channel, categories,
    ))))
}

pub async fn delete_channel(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let existing = state
        .store()
        .get_channel(id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Channel", id))?;

    if existing.user_id != user.0.id {
        return Err(ApiError::forbidden(
            "You do not have permission to delete this channel",
        ));
    }

    state
        .store()
        .delete_channel(id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(ApiResponse::success(())))
}

async fn validate_payload(
    state: &Arc<AppState>,
    payload: &SaveChannelRequest,
) -> Result<(), ApiError> {
    validation::validate_name("channel name", &payload.name)?;
    validation::validate_description(payload.description.as_deref())?;
    validation::validate_channel_url(&payload.url)?;
    validation::validate_category_selection(&payload.categories)?;

    for &category_id in &payload.categories {
        if state
            .store()
            .get_channel_category(category_id)
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
