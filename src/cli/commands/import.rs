//! Legacy import command handler

use std::path::Path;

use crate::config::Config;
use crate::db::Store;
use crate::legacy::{LegacyImporter, LegacySource};

pub async fn cmd_import_legacy(config: &Config, path: Option<&str>) -> anyhow::Result<()> {
    let legacy_path = path.unwrap_or(&config.import.legacy_database_path);
    let legacy_path = Path::new(legacy_path);

    println!("Configuring legacy SQLite connection: {}", legacy_path.display());
    let source = LegacySource::open(legacy_path).await?;

    let store = Store::new(&config.general.database_path).await?;
    let importer = LegacyImporter::new(store.conn.clone());

    println!("Importing legacy data from {}", legacy_path.display());
    let summary = importer.run(&source).await?;

    println!("  Playlists:          {}", summary.playlists);
    println!("  Channel categories: {}", summary.channel_categories);
    println!("  Channels:           {}", summary.channels);
    if summary.skipped_duplicate_channels > 0 {
        println!(
            "  Skipped duplicates: {}",
            summary.skipped_duplicate_channels
        );
    }
    println!();
    println!("Legacy data imported successfully.");

    Ok(())
}
