pub use super::channel_categories::Entity as ChannelCategories;
pub use super::channel_category::Entity as ChannelCategory;
pub use super::channels::Entity as Channels;
pub use super::playlist_categories::Entity as PlaylistCategories;
pub use super::playlist_category::Entity as PlaylistCategory;
pub use super::playlists::Entity as Playlists;
pub use super::users::Entity as Users;
