use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::playlist::PlaylistSearchField;
pub use repositories::user::User;

use crate::entities::{channel_categories, channels, playlist_categories, playlists};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn playlist_repo(&self) -> repositories::playlist::PlaylistRepository {
        repositories::playlist::PlaylistRepository::new(self.conn.clone())
    }

    fn channel_repo(&self) -> repositories::channel::ChannelRepository {
        repositories::channel::ChannelRepository::new(self.conn.clone())
    }

    fn playlist_category_repo(&self) -> repositories::playlist_category::PlaylistCategoryRepository {
        repositories::playlist_category::PlaylistCategoryRepository::new(self.conn.clone())
    }

    fn channel_category_repo(&self) -> repositories::channel_category::ChannelCategoryRepository {
        repositories::channel_category::ChannelCategoryRepository::new(self.conn.clone())
    }

    // ----- users -----

    pub async fn first_user(&self) -> Result<Option<User>> {
        self.user_repo().first().await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>> {
        self.user_repo().verify_api_key(api_key).await
    }

    pub async fn get_user_api_key(&self, username: &str) -> Result<Option<String>> {
        self.user_repo().get_api_key(username).await
    }

    pub async fn create_user(&self, username: &str, password: &str) -> Result<User> {
        self.user_repo().create(username, password).await
    }

    pub async fn user_count(&self) -> Result<u64> {
        self.user_repo().count().await
    }

    // ----- playlist categories -----

    pub async fn list_playlist_categories(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<(playlist_categories::Model, i64)>> {
        self.playlist_category_repo().list(search).await
    }

    pub async fn get_playlist_category(
        &self,
        id: i32,
    ) -> Result<Option<playlist_categories::Model>> {
        self.playlist_category_repo().get(id).await
    }

    pub async fn playlist_category_name_taken(
        &self,
        name: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool> {
        self.playlist_category_repo()
            .name_taken(name, exclude_id)
            .await
    }

    pub async fn create_playlist_category(
        &self,
        name: &str,
    ) -> Result<playlist_categories::Model> {
        self.playlist_category_repo().create(name).await
    }

    pub async fn rename_playlist_category(
        &self,
        id: i32,
        name: &str,
    ) -> Result<Option<playlist_categories::Model>> {
        self.playlist_category_repo().rename(id, name).await
    }

    pub async fn delete_playlist_category(&self, id: i32) -> Result<bool> {
        self.playlist_category_repo().delete(id).await
    }

    pub async fn playlist_category_count(&self) -> Result<u64> {
        self.playlist_category_repo().count().await
    }

    // ----- playlists -----

    pub async fn list_playlists_for_category(
        &self,
        category_id: i32,
        user_id: i32,
        search: Option<&str>,
    ) -> Result<Vec<(playlists::Model, Vec<playlist_categories::Model>)>> {
        self.playlist_repo()
            .list_for_category(category_id, user_id, search)
            .await
    }

    pub async fn search_playlists(
        &self,
        user_id: i32,
        field: PlaylistSearchField,
        term: &str,
    ) -> Result<Vec<(playlists::Model, Vec<playlist_categories::Model>)>> {
        self.playlist_repo().search(user_id, field, term).await
    }

    pub async fn get_playlist(&self, id: i32) -> Result<Option<playlists::Model>> {
        self.playlist_repo().get(id).await
    }

    pub async fn get_playlist_with_categories(
        &self,
        id: i32,
    ) -> Result<Option<(playlists::Model, Vec<playlist_categories::Model>)>> {
        self.playlist_repo().get_with_categories(id).await
    }

    pub async fn playlist_url_taken(&self, url: &str, exclude_id: Option<i32>) -> Result<bool> {
        self.playlist_repo().url_taken(url, exclude_id).await
    }

    pub async fn create_playlist(
        &self,
        user_id: i32,
        title: &str,
        description: Option<&str>,
        url: &str,
        category_ids: &[i32],
    ) -> Result<playlists::Model> {
        self.playlist_repo()
            .create(user_id, title, description, url, category_ids)
            .await
    }

    pub async fn update_playlist(
        &self,
        id: i32,
        title: &str,
        description: Option<&str>,
        url: &str,
        category_ids: &[i32],
    ) -> Result<Option<playlists::Model>> {
        self.playlist_repo()
            .update(id, title, description, url, category_ids)
            .await
    }

    pub async fn delete_playlist(&self, id: i32) -> Result<bool> {
        self.playlist_repo().delete(id).await
    }

    pub async fn playlist_count(&self) -> Result<u64> {
        self.playlist_repo().count().await
    }

    // ----- channel categories -----

    pub async fn list_channel_categories(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<(channel_categories::Model, i64)>> {
        self.channel_category_repo().list(search).await
    }

    pub async fn get_channel_category(&self, id: i32) -> Result<Option<channel_categories::Model>> {
        self.channel_category_repo().get(id).await
    }

    pub async fn channel_category_name_taken(
        &self,
        name: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool> {
        self.channel_category_repo()
            .name_taken(name, exclude_id)
            .await
    }

    pub async fn create_channel_category(&self, name: &str) -> Result<channel_categories::Model> {
        self.channel_category_repo().create(name).await
    }

    pub async fn rename_channel_category(
        &self,
        id: i32,
        name: &str,
    ) -> Result<Option<channel_categories::Model>> {
        self.channel_category_repo().rename(id, name).await
    }

    pub async fn delete_channel_category(&self, id: i32) -> Result<bool> {
        self.channel_category_repo().delete(id).await
    }

    pub async fn channel_category_count(&self) -> Result<u64> {
        self.channel_category_repo().count().await
    }

    // ----- channels -----

    pub async fn list_channels_for_category(
        &self,
        category_id: i32,
        user_id: i32,
        search: Option<&str>,
    ) -> Result<Vec<(channels::Model, Vec<channel_categories::Model>)>> {
        self.channel_repo()
            .list_for_category(category_id, user_id, search)
            .await
    }

    pub async fn get_channel(&self, id: i32) -> Result<Option<channels::Model>> {
        self.channel_repo().get(id).await
    }

    pub async fn get_channel_with_categories(
        &self,
        id: i32,
    ) -> Result<Option<(channels::Model, Vec<channel_categories::Model>)>> {
        self.channel_repo().get_with_categories(id).await
    }

    pub async fn channel_url_taken(&self, url: &str, exclude_id: Option<i32>) -> Result<bool> {
        self.channel_repo().url_taken(url, exclude_id).await
    }

    pub async fn create_channel(
        &self,
        user_id: i32,
        name: &str,
        description: Option<&str>,
        url: &str,
        category_ids: &[i32],
    ) -> Result<channels::Model> {
        self.channel_repo()
            .create(user_id, name, description, url, category_ids)
            .await
    }

    pub async fn update_channel(
        &self,
        id: i32,
        name: &str,
        description: Option<&str>,
        url: &str,
        category_ids: &[i32],
    ) -> Result<Option<channels::Model>> {
        self.channel_repo()
            .update(id, name, description, url, category_ids)
            .await
    }

    pub async fn delete_channel(&self, id: i32) -> Result<bool> {
        self.channel_repo().delete(id).await
    }

    pub async fn channel_count(&self) -> Result<u64> {
        self.channel_repo().count().await
    }
}
