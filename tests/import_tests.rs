//! Integration tests for the legacy database importer.

use std::path::{Path, PathBuf};

use sea_orm::{ColumnTrait, ConnectionTrait, Database, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use tubarr::db::Store;
use tubarr::entities::{
    channel_categories, channel_category, channels, playlist_categories, playlist_category,
    playlists, prelude::*,
};
use tubarr::legacy::{ImportError, LegacyImporter, LegacySource};

fn temp_db_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("tubarr-{tag}-{}.db", uuid::Uuid::new_v4()))
}

async fn spawn_store() -> (Store, PathBuf) {
    let path = temp_db_path("import-test");
    let store = Store::new(&format!("sqlite:{}", path.display()))
        .await
        .expect("failed to create store");
    (store, path)
}

const LEGACY_SCHEMA: &[&str] = &[
    "CREATE TABLE YouTube_Playlist (Id INTEGER PRIMARY KEY, Title TEXT NOT NULL, url TEXT NOT NULL)",
    "CREATE TABLE Channels_Categories (Category_Id INTEGER PRIMARY KEY, CategoryName TEXT NOT NULL)",
    "CREATE TABLE YouTube_Channels (Channel_Id INTEGER PRIMARY KEY, ChannelCategory INTEGER NOT NULL, ChannelName TEXT NOT NULL, url TEXT NOT NULL)",
];

async fn create_legacy_db(path: &Path, inserts: &[&str]) {
    std::fs::File::create(path).expect("failed to create legacy db file");

    let conn = Database::connect(format!("sqlite://{}", path.display()))
        .await
        .expect("failed to open legacy db");

    for statement in LEGACY_SCHEMA {
        conn.execute_unprepared(statement)
            .await
            .expect("failed to create legacy schema");
    }
    for statement in inserts {
        conn.execute_unprepared(statement)
            .await
            .expect("failed to seed legacy db");
    }
}

/// Seeds the destination with one of everything so tests can verify the
/// importer's full-replace semantics.
async fn seed_existing_data(store: &Store, user_id: i32) {
    let category = store
        .create_playlist_category("Existing")
        .await
        .expect("failed to seed playlist category");
    store
        .create_playlist(
            user_id,
            "Existing playlist",
            None,
            "https://www.youtube.com/playlist?list=existing",
            &[category.id],
        )
        .await
        .expect("failed to seed playlist");

    let channel_cat = store
        .create_channel_category("Existing")
        .await
        .expect("failed to seed channel category");
    store
        .create_channel(
            user_id,
            "Existing channel",
            None,
            "https://www.youtube.com/@existing",
            &[channel_cat.id],
        )
        .await
        .expect("failed to seed channel");
}

#[tokio::test]
async fn imports_data_from_the_legacy_sqlite_dump() {
    let (store, dest_path) = spawn_store().await;
    let user = store.create_user("admin", "password").await.unwrap();
    seed_existing_data(&store, user.id).await;

    let legacy_path = temp_db_path("legacy");
    create_legacy_db(
        &legacy_path,
        &[
            "INSERT INTO YouTube_Playlist (Id, Title, url) VALUES (1, 'Legacy Playlist', '/playlist?list=PL123456')",
            "INSERT INTO Channels_Categories (Category_Id, CategoryName) VALUES (1, 'Legacy Category')",
            "INSERT INTO YouTube_Channels (Channel_Id, ChannelCategory, ChannelName, url) VALUES (1, 1, 'Legacy Channel', ' https://www.youtube.com/@legacy ')",
            "INSERT INTO YouTube_Channels (Channel_Id, ChannelCategory, ChannelName, url) VALUES (2, 1, 'Legacy Channel Duplicate', 'https://www.youtube.com/@legacy')",
        ],
    )
    .await;

    let source = LegacySource::open(&legacy_path).await.unwrap();
    let summary = LegacyImporter::new(store.conn.clone())
        .run(&source)
        .await
        .expect("import failed");

    assert_eq!(summary.playlists, 1);
    assert_eq!(summary.channel_categories, 1);
    assert_eq!(summary.channels, 1);
    assert_eq!(summary.skipped_duplicate_channels, 1);

    // Pre-existing data is fully replaced.
    assert_eq!(Playlists::find().count(&store.conn).await.unwrap(), 1);
    assert_eq!(Channels::find().count(&store.conn).await.unwrap(), 1);
    assert_eq!(
        PlaylistCategories::find().count(&store.conn).await.unwrap(),
        1
    );
    assert_eq!(
        ChannelCategories::find().count(&store.conn).await.unwrap(),
        1
    );

    let playlist = Playlists::find().one(&store.conn).await.unwrap().unwrap();
    assert_eq!(playlist.title, "Legacy Playlist");
    assert_eq!(playlist.url, "https://www.youtube.com/playlist?list=PL123456");
    assert_eq!(playlist.description, None);
    assert_eq!(playlist.user_id, user.id);

    let general = PlaylistCategories::find()
        .filter(playlist_categories::Column::Name.eq("General"))
        .one(&store.conn)
        .await
        .unwrap()
        .expect("General category missing");
    let attached = PlaylistCategory::find()
        .filter(playlist_category::Column::PlaylistId.eq(playlist.id))
        .all(&store.conn)
        .await
        .unwrap();
    assert_eq!(attached.len(), 1);
    assert_eq!(attached[0].category_id, general.id);

    let channel = Channels::find().one(&store.conn).await.unwrap().unwrap();
    assert_eq!(channel.name, "Legacy Channel");
    assert_eq!(channel.url, "https://www.youtube.com/@legacy");

    let legacy_category = ChannelCategories::find()
        .filter(channel_categories::Column::Name.eq("Legacy Category"))
        .one(&store.conn)
        .await
        .unwrap()
        .expect("Legacy Category missing");
    let attached = ChannelCategory::find()
        .filter(channel_category::Column::ChannelId.eq(channel.id))
        .all(&store.conn)
        .await
        .unwrap();
    assert_eq!(attached.len(), 1);
    assert_eq!(attached[0].category_id, legacy_category.id);

    std::fs::remove_file(&legacy_path).ok();
    std::fs::remove_file(&dest_path).ok();
}

#[tokio::test]
async fn reimport_assigns_identical_ids() {
    let (store, dest_path) = spawn_store().await;
    store.create_user("admin", "password").await.unwrap();

    let legacy_path = temp_db_path("legacy-idempotent");
    create_legacy_db(
        &legacy_path,
        &[
            "INSERT INTO YouTube_Playlist (Id, Title, url) VALUES (3, 'First', '/playlist?list=A')",
            "INSERT INTO YouTube_Playlist (Id, Title, url) VALUES (7, 'Second', '/playlist?list=B')",
            "INSERT INTO Channels_Categories (Category_Id, CategoryName) VALUES (5, 'Tech')",
            "INSERT INTO YouTube_Channels (Channel_Id, ChannelCategory, ChannelName, url) VALUES (2, 5, 'Chan', 'https://www.youtube.com/@chan')",
        ],
    )
    .await;

    let source = LegacySource::open(&legacy_path).await.unwrap();
    let importer = LegacyImporter::new(store.conn.clone());

    let snapshot_rows = |conn: sea_orm::DatabaseConnection| async move {
        let playlists: Vec<(i32, String, String)> = Playlists::find()
            .order_by_asc(playlists::Column::Id)
            .all(&conn)
            .await
            .unwrap()
            .into_iter()
            .map(|p| (p.id, p.title, p.url))
            .collect();
        let channels: Vec<(i32, String, String)> = Channels::find()
            .order_by_asc(channels::Column::Id)
            .all(&conn)
            .await
            .unwrap()
            .into_iter()
            .map(|c| (c.id, c.name, c.url))
            .collect();
        (playlists, channels)
    };

    importer.run(&source).await.expect("first import failed");
    let first = snapshot_rows(store.conn.clone()).await;

    importer.run(&source).await.expect("second import failed");
    let second = snapshot_rows(store.conn.clone()).await;

    assert_eq!(first, second);

    // Sequence reset keeps ids low and stable: source order decides them.
    assert_eq!(first.0[0].0, 1);
    assert_eq!(first.0[0].1, "First");
    assert_eq!(first.0[1].0, 2);
    assert_eq!(first.1[0].0, 1);

    std::fs::remove_file(&legacy_path).ok();
    std::fs::remove_file(&dest_path).ok();
}

#[tokio::test]
async fn duplicate_playlist_urls_roll_back_the_whole_import() {
    let (store, dest_path) = spawn_store().await;
    let user = store.create_user("admin", "password").await.unwrap();
    seed_existing_data(&store, user.id).await;

    let legacy_path = temp_db_path("legacy-rollback");
    create_legacy_db(
        &legacy_path,
        &[
            "INSERT INTO YouTube_Playlist (Id, Title, url) VALUES (1, 'One', '/playlist?list=SAME')",
            "INSERT INTO YouTube_Playlist (Id, Title, url) VALUES (2, 'Two', '/playlist?list=SAME')",
        ],
    )
    .await;

    let source = LegacySource::open(&legacy_path).await.unwrap();
    let result = LegacyImporter::new(store.conn.clone()).run(&source).await;

    assert!(matches!(result, Err(ImportError::ConstraintViolation(_))));

    // The destination still holds exactly its pre-run content.
    let playlist = Playlists::find().one(&store.conn).await.unwrap().unwrap();
    assert_eq!(playlist.title, "Existing playlist");
    assert_eq!(Playlists::find().count(&store.conn).await.unwrap(), 1);
    assert_eq!(Channels::find().count(&store.conn).await.unwrap(), 1);
    assert_eq!(
        PlaylistCategories::find().count(&store.conn).await.unwrap(),
        1
    );
    let category = PlaylistCategories::find()
        .one(&store.conn)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(category.name, "Existing");

    std::fs::remove_file(&legacy_path).ok();
    std::fs::remove_file(&dest_path).ok();
}

#[tokio::test]
async fn unmapped_category_leaves_channel_uncategorized() {
    let (store, dest_path) = spawn_store().await;
    store.create_user("admin", "password").await.unwrap();

    let legacy_path = temp_db_path("legacy-unmapped");
    create_legacy_db(
        &legacy_path,
        &[
            "INSERT INTO Channels_Categories (Category_Id, CategoryName) VALUES (1, ' Trimmed Name ')",
            "INSERT INTO YouTube_Channels (Channel_Id, ChannelCategory, ChannelName, url) VALUES (1, 1, 'Mapped', 'https://www.youtube.com/@mapped')",
            "INSERT INTO YouTube_Channels (Channel_Id, ChannelCategory, ChannelName, url) VALUES (2, 99, 'Orphan', 'https://www.youtube.com/@orphan')",
        ],
    )
    .await;

    let source = LegacySource::open(&legacy_path).await.unwrap();
    let summary = LegacyImporter::new(store.conn.clone())
        .run(&source)
        .await
        .expect("import failed");

    assert_eq!(summary.channels, 2);
    assert_eq!(summary.skipped_duplicate_channels, 0);

    let category = ChannelCategories::find()
        .one(&store.conn)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(category.name, "Trimmed Name");

    let mapped = Channels::find()
        .filter(channels::Column::Name.eq("Mapped"))
        .one(&store.conn)
        .await
        .unwrap()
        .unwrap();
    let orphan = Channels::find()
        .filter(channels::Column::Name.eq("Orphan"))
        .one(&store.conn)
        .await
        .unwrap()
        .unwrap();

    let mapped_links = ChannelCategory::find()
        .filter(channel_category::Column::ChannelId.eq(mapped.id))
        .count(&store.conn)
        .await
        .unwrap();
    let orphan_links = ChannelCategory::find()
        .filter(channel_category::Column::ChannelId.eq(orphan.id))
        .count(&store.conn)
        .await
        .unwrap();

    assert_eq!(mapped_links, 1);
    assert_eq!(orphan_links, 0);

    std::fs::remove_file(&legacy_path).ok();
    std::fs::remove_file(&dest_path).ok();
}

#[tokio::test]
async fn blank_channel_urls_are_dropped_without_counting_as_duplicates() {
    let (store, dest_path) = spawn_store().await;
    store.create_user("admin", "password").await.unwrap();

    let legacy_path = temp_db_path("legacy-blank");
    create_legacy_db(
        &legacy_path,
        &[
            "INSERT INTO YouTube_Channels (Channel_Id, ChannelCategory, ChannelName, url) VALUES (1, 1, 'Blank', '   ')",
            "INSERT INTO YouTube_Channels (Channel_Id, ChannelCategory, ChannelName, url) VALUES (2, 1, 'Real', 'https://www.youtube.com/@real')",
        ],
    )
    .await;

    let source = LegacySource::open(&legacy_path).await.unwrap();
    let summary = LegacyImporter::new(store.conn.clone())
        .run(&source)
        .await
        .expect("import failed");

    assert_eq!(summary.channels, 1);
    assert_eq!(summary.skipped_duplicate_channels, 0);
    assert_eq!(Channels::find().count(&store.conn).await.unwrap(), 1);

    std::fs::remove_file(&legacy_path).ok();
    std::fs::remove_file(&dest_path).ok();
}

#[tokio::test]
async fn missing_legacy_file_fails_without_touching_the_destination() {
    let (store, dest_path) = spawn_store().await;
    let user = store.create_user("admin", "password").await.unwrap();
    seed_existing_data(&store, user.id).await;

    let missing = temp_db_path("does-not-exist");
    let result = LegacySource::open(&missing).await;

    assert!(matches!(result, Err(ImportError::SourceNotFound(_))));
    assert_eq!(Playlists::find().count(&store.conn).await.unwrap(), 1);
    assert_eq!(Channels::find().count(&store.conn).await.unwrap(), 1);

    std::fs::remove_file(&dest_path).ok();
}

#[tokio::test]
async fn import_requires_an_existing_user() {
    let (store, dest_path) = spawn_store().await;

    let legacy_path = temp_db_path("legacy-no-user");
    create_legacy_db(
        &legacy_path,
        &["INSERT INTO YouTube_Playlist (Id, Title, url) VALUES (1, 'P', '/playlist?list=A')"],
    )
    .await;

    let source = LegacySource::open(&legacy_path).await.unwrap();
    let result = LegacyImporter::new(store.conn.clone()).run(&source).await;

    assert!(matches!(result, Err(ImportError::NoOwnerAvailable)));
    assert_eq!(Playlists::find().count(&store.conn).await.unwrap(), 0);
    assert_eq!(
        PlaylistCategories::find().count(&store.conn).await.unwrap(),
        0
    );

    std::fs::remove_file(&legacy_path).ok();
    std::fs::remove_file(&dest_path).ok();
}
