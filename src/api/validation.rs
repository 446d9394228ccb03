use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use super::ApiError;
use crate::constants::limits::{MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH};

/// Accepts YouTube playlist URLs: any youtube.com URL carrying a `list`
/// query parameter.
static PLAYLIST_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(www\.)?youtube\.com/.*[?&]list=[^&]+").unwrap()
});

/// Accepts YouTube channel URLs in the forms `@handle`, `c/name`,
/// `channel/ID`, and `user/name`.
static CHANNEL_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(www\.)?youtube\.com/(@[^/?]+|c/[^/?]+|channel/[^/?]+|user/[^/?]+)")
        .unwrap()
});

pub fn validate_name(label: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("The {label} is required")));
    }

    if value.len() > MAX_NAME_LENGTH {
        return Err(ApiError::validation(format!(
            "The {label} may not be longer than {MAX_NAME_LENGTH} characters"
        )));
    }

    Ok(())
}

pub fn validate_description(description: Option<&str>) -> Result<(), ApiError> {
    if let Some(text) = description
        && text.len() > MAX_DESCRIPTION_LENGTH
    {
        return Err(ApiError::validation(format!(
            "The description may not be longer than {MAX_DESCRIPTION_LENGTH} characters"
        )));
    }

    Ok(())
}

pub fn validate_playlist_url(url: &str) -> Result<(), ApiError> {
    if url.trim().is_empty() {
        return Err(ApiError::validation("The YouTube URL is required"));
    }

    if Url::parse(url).is_err() {
        return Err(ApiError::validation("The URL is not valid"));
    }

    if !PLAYLIST_URL_RE.is_match(url) {
        return Err(ApiError::validation(
            "The URL must be a valid YouTube playlist URL (it must contain a \"list\" parameter)",
        ));
    }

    Ok(())
}

pub fn validate_channel_url(url: &str) -> Result<(), ApiError> {
    if url.trim().is_empty() {
        return Err(ApiError::validation("The YouTube URL is required"));
    }

    if Url::parse(url).is_err() {
        return Err(ApiError::validation("The URL is not valid"));
    }

    if !CHANNEL_URL_RE.is_match(url) {
        return Err(ApiError::validation(
            "The URL must be a valid YouTube channel URL (formats: @handle, c/name, channel/ID, user/name)",
        ));
    }

    Ok(())
}

pub fn validate_category_selection(categories: &[i32]) -> Result<(), ApiError> {
    if categories.is_empty() {
        return Err(ApiError::validation("At least one category must be selected"));
    }

    Ok(())
}
