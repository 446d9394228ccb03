use std::collections::{HashMap, HashSet};

use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryOrder, Set, Statement, TransactionTrait,
};
use tracing::{info, warn};

use crate::constants::{GENERAL_PLAYLIST_CATEGORY, YOUTUBE_BASE_URL};
use crate::entities::{
    channel_categories, channel_category, channels, playlist_categories, playlist_category,
    playlists, prelude::*, users,
};

use super::source::{LegacyChannel, LegacyChannelCategory, LegacyPlaylist, LegacySnapshot};
use super::{ImportError, LegacySource};

/// Per-entity counts reported after a successful import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub playlists: usize,
    pub channel_categories: usize,
    pub channels: usize,
    pub skipped_duplicate_channels: usize,
}

/// Rewrites the destination playlist/channel tables from a legacy snapshot.
///
/// The destination connection is passed in explicitly; the importer never
/// reads ambient configuration. All mutation happens inside one transaction,
/// so a failure at any step leaves the destination exactly as it was.
pub struct LegacyImporter {
    conn: DatabaseConnection,
}

impl LegacyImporter {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn run(&self, source: &LegacySource) -> Result<ImportSummary, ImportError> {
        let owner = Users::find()
            .order_by_asc(users::Column::Id)
            .one(&self.conn)
            .await?
            .ok_or(ImportError::NoOwnerAvailable)?;
        let owner_id = owner.id;

        let snapshot = source.snapshot().await?;

        let summary = self
            .conn
            .transaction::<_, ImportSummary, ImportError>(move |txn| {
                Box::pin(async move { rewrite(txn, &snapshot, owner_id).await })
            })
            .await
            .map_err(ImportError::from)?;

        info!(
            "Legacy data imported: {} playlists, {} channel categories, {} channels ({} duplicates skipped)",
            summary.playlists,
            summary.channel_categories,
            summary.channels,
            summary.skipped_duplicate_channels
        );

        Ok(summary)
    }
}

async fn rewrite(
    txn: &DatabaseTransaction,
    snapshot: &LegacySnapshot,
    owner_id: i32,
) -> Result<ImportSummary, ImportError> {
    clear_existing(txn).await?;

    let playlists = import_playlists(txn, &snapshot.playlists, owner_id).await?;
    let category_map = import_channel_categories(txn, &snapshot.channel_categories).await?;
    let (channels, skipped) =
        import_channels(txn, &snapshot.channels, owner_id, &category_map).await?;

    Ok(ImportSummary {
        playlists,
        channel_categories: category_map.len(),
        channels,
        skipped_duplicate_channels: skipped,
    })
}

/// Deletes all playlist/channel rows (pivot tables first, to satisfy the
/// referential constraints) and resets the auto-increment counters so the
/// re-inserted rows start from id 1 again.
async fn clear_existing(txn: &DatabaseTransaction) -> Result<(), ImportError> {
    info!("Clearing existing YouTube data");

    PlaylistCategory::delete_many().exec(txn).await?;
    ChannelCategory::delete_many().exec(txn).await?;
    Playlists::delete_many().exec(txn).await?;
    Channels::delete_many().exec(txn).await?;
    PlaylistCategories::delete_many().exec(txn).await?;
    ChannelCategories::delete_many().exec(txn).await?;

    let backend = txn.get_database_backend();
    txn.execute(Statement::from_string(
        backend,
        "DELETE FROM sqlite_sequence WHERE name IN ('playlists', 'playlist_categories', 'channels', 'channel_categories')"
            .to_string(),
    ))
    .await?;

    Ok(())
}

/// Inserts every legacy playlist in source order, attached to a single fresh
/// "General" category. Playlists are not deduplicated; a duplicate URL in the
/// legacy data violates the unique index and aborts the whole import.
async fn import_playlists(
    txn: &DatabaseTransaction,
    legacy: &[LegacyPlaylist],
    owner_id: i32,
) -> Result<usize, ImportError> {
    info!("Importing playlists");

    let now = chrono::Utc::now().to_rfc3339();

    let general = playlist_categories::ActiveModel {
        name: Set(GENERAL_PLAYLIST_CATEGORY.to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    for row in legacy {
        let playlist = playlists::ActiveModel {
            user_id: Set(owner_id),
            title: Set(row.title.trim().to_string()),
            description: Set(None),
            url: Set(normalize_playlist_url(&row.url)),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        }
        .insert(txn)
        .await?;

        playlist_category::ActiveModel {
            playlist_id: Set(playlist.id),
            category_id: Set(general.id),
        }
        .insert(txn)
        .await?;
    }

    info!("Imported {} playlists", legacy.len());
    Ok(legacy.len())
}

/// Inserts the legacy channel categories in source order and returns the
/// legacy-id to destination-id mapping used when attaching channels.
async fn import_channel_categories(
    txn: &DatabaseTransaction,
    legacy: &[LegacyChannelCategory],
) -> Result<HashMap<i64, i32>, ImportError> {
    info!("Importing channel categories");

    let now = chrono::Utc::now().to_rfc3339();
    let mut category_map = HashMap::with_capacity(legacy.len());

    for row in legacy {
        let category = channel_categories::ActiveModel {
            name: Set(row.name.trim().to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        }
        .insert(txn)
        .await?;

        category_map.insert(row.id, category.id);
    }

    info!("Imported {} channel categories", legacy.len());
    Ok(category_map)
}

/// Inserts legacy channels in source order, deduplicating on the normalized
/// URL (first occurrence wins). Rows whose URL trims to empty are dropped
/// silently; rows referencing an unknown legacy category are imported without
/// a category attachment.
async fn import_channels(
    txn: &DatabaseTransaction,
    legacy: &[LegacyChannel],
    owner_id: i32,
    category_map: &HashMap<i64, i32>,
) -> Result<(usize, usize), ImportError> {
    info!("Importing channels");

    let now = chrono::Utc::now().to_rfc3339();
    let mut imported_urls: HashSet<String> = HashSet::new();
    let mut inserted = 0;
    let mut skipped_duplicates = 0;

    for row in legacy {
        let normalized_url = normalize_channel_url(&row.url);

        if normalized_url.is_empty() {
            continue;
        }

        if imported_urls.contains(&normalized_url) {
            warn!("Skipping duplicate channel URL: {normalized_url}");
            skipped_duplicates += 1;
            continue;
        }

        let channel = channels::ActiveModel {
            user_id: Set(owner_id),
            name: Set(row.name.trim().to_string()),
            description: Set(None),
            url: Set(normalized_url.clone()),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        }
        .insert(txn)
        .await?;

        imported_urls.insert(normalized_url);
        inserted += 1;

        if let Some(&category_id) = category_map.get(&row.category_id) {
            channel_category::ActiveModel {
                channel_id: Set(channel.id),
                category_id: Set(category_id),
            }
            .insert(txn)
            .await?;
        }
    }

    info!("Imported {inserted} channels ({skipped_duplicates} duplicates skipped)");
    Ok((inserted, skipped_duplicates))
}

/// Trims the legacy playlist URL and, when it is a bare path rather than an
/// absolute URL, prefixes the canonical YouTube host.
#[must_use]
pub fn normalize_playlist_url(url: &str) -> String {
    let trimmed = url.trim();

    if trimmed.is_empty() || trimmed.starts_with("http") {
        return trimmed.to_string();
    }

    let path = trimmed.trim_start_matches('/');
    format!("{YOUTUBE_BASE_URL}/{path}")
}

/// Legacy channel URLs are assumed already absolute; only whitespace is
/// stripped.
#[must_use]
pub fn normalize_channel_url(url: &str) -> String {
    url.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playlist_path_gets_host_prefix() {
        assert_eq!(
            normalize_playlist_url("/playlist?list=PL123456"),
            "https://www.youtube.com/playlist?list=PL123456"
        );
    }

    #[test]
    fn playlist_path_without_leading_slash_gets_one() {
        assert_eq!(
            normalize_playlist_url("playlist?list=PL123456"),
            "https://www.youtube.com/playlist?list=PL123456"
        );
    }

    #[test]
    fn playlist_absolute_url_passes_through() {
        assert_eq!(
            normalize_playlist_url("  https://www.youtube.com/playlist?list=abc  "),
            "https://www.youtube.com/playlist?list=abc"
        );
        assert_eq!(
            normalize_playlist_url("http://youtube.com/playlist?list=abc"),
            "http://youtube.com/playlist?list=abc"
        );
    }

    #[test]
    fn playlist_empty_url_stays_empty() {
        assert_eq!(normalize_playlist_url("   "), "");
    }

    #[test]
    fn channel_url_is_only_trimmed() {
        assert_eq!(
            normalize_channel_url(" https://www.youtube.com/@legacy "),
            "https://www.youtube.com/@legacy"
        );
        assert_eq!(normalize_channel_url("\t\n"), "");
    }
}
