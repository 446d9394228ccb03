use serde::{Deserialize, Serialize};

use crate::entities::{channel_categories, channels, playlist_categories, playlists};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Category reference embedded in playlist/channel payloads.
#[derive(Debug, Serialize, Clone)]
pub struct CategoryRefDto {
    pub id: i32,
    pub name: String,
}

impl From<playlist_categories::Model> for CategoryRefDto {
    fn from(model: playlist_categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

impl From<channel_categories::Model> for CategoryRefDto {
    fn from(model: channel_categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlaylistCategoryDto {
    pub id: i32,
    pub name: String,
    pub playlist_count: i64,
}

#[derive(Debug, Serialize)]
pub struct ChannelCategoryDto {
    pub id: i32,
    pub name: String,
    pub channel_count: i64,
}

#[derive(Debug, Serialize)]
pub struct PlaylistDto {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub categories: Vec<CategoryRefDto>,
    pub created_at: String,
}

impl PlaylistDto {
    #[must_use]
    pub fn from_model(model: playlists::Model, categories: Vec<playlist_categories::Model>) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            url: model.url,
            categories: categories.into_iter().map(CategoryRefDto::from).collect(),
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChannelDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub categories: Vec<CategoryRefDto>,
    pub created_at: String,
}

impl ChannelDto {
    #[must_use]
    pub fn from_model(model: channels::Model, categories: Vec<channel_categories::Model>) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            url: model.url,
            categories: categories.into_iter().map(CategoryRefDto::from).collect(),
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SaveCategoryRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SavePlaylistRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    pub categories: Vec<i32>,
}

#[derive(Debug, Deserialize)]
pub struct SaveChannelRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    pub categories: Vec<i32>,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime: u64,
    pub playlists: u64,
    pub playlist_categories: u64,
    pub channels: u64,
    pub channel_categories: u64,
}
