//! CLI module - Command-line interface for Tubarr
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// Tubarr - YouTube Content Manager
/// Organize YouTube playlists and channels into categories
#[derive(Parser)]
#[command(name = "tubarr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    #[command(alias = "web")]
    Serve,

    /// Import data from the legacy desktop application's database
    Import {
        /// Path of the legacy SQLite file (defaults to the configured path)
        path: Option<String>,
    },

    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a user
    Add {
        /// Username
        username: String,
        /// Password (generated and printed when omitted)
        #[arg(long)]
        password: Option<String>,
    },
}

pub use commands::*;
