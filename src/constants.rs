/// Canonical host prefixed onto relative legacy playlist paths.
pub const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

/// Name of the category every imported playlist is attached to.
pub const GENERAL_PLAYLIST_CATEGORY: &str = "General";

/// Default filename of the legacy desktop application's database.
pub const DEFAULT_LEGACY_DB: &str = "YouTube_Playlist.db";

pub mod limits {

    pub const MAX_NAME_LENGTH: usize = 255;

    pub const MAX_DESCRIPTION_LENGTH: usize = 1000;
}
