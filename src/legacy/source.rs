use std::path::Path;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use tracing::info;

use super::ImportError;

/// Row from the legacy `YouTube_Playlist` table.
#[derive(Debug, Clone)]
pub struct LegacyPlaylist {
    pub id: i64,
    pub title: String,
    pub url: String,
}

/// Row from the legacy `Channels_Categories` table.
#[derive(Debug, Clone)]
pub struct LegacyChannelCategory {
    pub id: i64,
    pub name: String,
}

/// Row from the legacy `YouTube_Channels` table.
#[derive(Debug, Clone)]
pub struct LegacyChannel {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub url: String,
}

/// Full in-memory copy of the legacy tables, each ordered by primary id
/// ascending. Taken once, before any destination mutation, so re-imports of
/// the same file assign identical destination ids.
#[derive(Debug, Clone, Default)]
pub struct LegacySnapshot {
    pub playlists: Vec<LegacyPlaylist>,
    pub channel_categories: Vec<LegacyChannelCategory>,
    pub channels: Vec<LegacyChannel>,
}

/// Read-only handle on the legacy SQLite dump.
pub struct LegacySource {
    conn: DatabaseConnection,
}

impl LegacySource {
    /// Open the legacy database at `path`. Fails with
    /// [`ImportError::SourceNotFound`] when the file does not exist.
    pub async fn open(path: &Path) -> Result<Self, ImportError> {
        if !path.exists() {
            return Err(ImportError::SourceNotFound(path.to_path_buf()));
        }

        info!("Configuring legacy SQLite connection: {}", path.display());

        let mut opt = ConnectOptions::new(format!("sqlite://{}?mode=ro", path.display()));
        opt.max_connections(1).sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        // The legacy schema does not guarantee referential integrity.
        conn.execute_unprepared("PRAGMA foreign_keys = OFF").await?;

        Ok(Self { conn })
    }

    /// Read the three legacy tables in full, ordered by primary id ascending.
    pub async fn snapshot(&self) -> Result<LegacySnapshot, ImportError> {
        info!("Reading legacy data");

        Ok(LegacySnapshot {
            playlists: self.read_playlists().await?,
            channel_categories: self.read_channel_categories().await?,
            channels: self.read_channels().await?,
        })
    }

    async fn read_playlists(&self) -> Result<Vec<LegacyPlaylist>, ImportError> {
        let rows = self
            .query_all("SELECT Id, Title, url FROM YouTube_Playlist ORDER BY Id ASC")
            .await?;

        let mut playlists = Vec::with_capacity(rows.len());
        for row in rows {
            playlists.push(LegacyPlaylist {
                id: row.try_get::<Option<i64>>("", "Id")?.unwrap_or_default(),
                title: row.try_get::<Option<String>>("", "Title")?.unwrap_or_default(),
                url: row.try_get::<Option<String>>("", "url")?.unwrap_or_default(),
            });
        }

        Ok(playlists)
    }

    async fn read_channel_categories(&self) -> Result<Vec<LegacyChannelCategory>, ImportError> {
        let rows = self
            .query_all(
                "SELECT Category_Id, CategoryName FROM Channels_Categories ORDER BY Category_Id ASC",
            )
            .await?;

        let mut categories = Vec::with_capacity(rows.len());
        for row in rows {
            categories.push(LegacyChannelCategory {
                id: row
                    .try_get::<Option<i64>>("", "Category_Id")?
                    .unwrap_or_default(),
                name: row
                    .try_get::<Option<String>>("", "CategoryName")?
                    .unwrap_or_default(),
            });
        }

        Ok(categories)
    }

    async fn read_channels(&self) -> Result<Vec<LegacyChannel>, ImportError> {
        let rows = self
            .query_all(
                "SELECT Channel_Id, ChannelCategory, ChannelName, url FROM YouTube_Channels ORDER BY Channel_Id ASC",
            )
            .await?;

        let mut channels = Vec::with_capacity(rows.len());
        for row in rows {
            channels.push(LegacyChannel {
                id: row
                    .try_get::<Option<i64>>("", "Channel_Id")?
                    .unwrap_or_default(),
                category_id: row
                    .try_get::<Option<i64>>("", "ChannelCategory")?
                    .unwrap_or_default(),
                name: row
                    .try_get::<Option<String>>("", "ChannelName")?
                    .unwrap_or_default(),
                url: row.try_get::<Option<String>>("", "url")?.unwrap_or_default(),
            });
        }

        Ok(channels)
    }

    async fn query_all(&self, sql: &str) -> Result<Vec<sea_orm::QueryResult>, ImportError> {
        let backend = self.conn.get_database_backend();
        let rows = self
            .conn
            .query_all(Statement::from_string(backend, sql.to_string()))
            .await?;
        Ok(rows)
    }
}
