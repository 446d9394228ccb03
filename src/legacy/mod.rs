//! One-time importer for the legacy desktop application's SQLite dump.
//!
//! The legacy store is read in full before any destination mutation, then the
//! destination tables are rewritten inside a single transaction: existing
//! playlist/channel data is deleted, auto-increment counters are reset, and
//! the normalized legacy rows are inserted in source order.

mod error;
mod importer;
mod source;

pub use error::ImportError;
pub use importer::{ImportSummary, LegacyImporter};
pub use source::{LegacyChannel, LegacyChannelCategory, LegacyPlaylist, LegacySnapshot, LegacySource};
