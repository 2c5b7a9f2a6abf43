//! CLI module - Command-line interface for zplex
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Args, Parser, Subcommand};

/// zplex - Drive-backed show library
/// Matches TMDB seasons against Drive folders and tracks what you watched
#[derive(Parser)]
#[command(name = "zplex")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Save a show and its Drive root folder
    #[command(alias = "add")]
    AddShow {
        /// TMDB show ID
        tmdb_id: i32,
        /// Show name
        name: String,
        /// Drive folder holding the `Season N` subfolders
        #[arg(long)]
        folder_id: Option<String>,
        /// TMDB poster path
        #[arg(long)]
        poster: Option<String>,
    },

    /// List saved and downloaded shows
    #[command(alias = "ls")]
    Shows,

    /// Show a season with matched files and watch progress
    #[command(alias = "s")]
    Season(SeasonArgs),

    /// Record a playback position
    #[command(alias = "p")]
    Progress {
        tmdb_id: i32,
        season: i32,
        episode: i32,
        /// Position in milliseconds
        watched_ms: i64,
        /// Runtime in milliseconds
        total_ms: i64,
    },

    /// Download an episode for offline playback
    #[command(alias = "dl")]
    Download {
        tmdb_id: i32,
        season: i32,
        episode: i32,
    },

    /// Delete a downloaded episode
    #[command(alias = "rm")]
    RemoveOffline {
        tmdb_id: i32,
        season: i32,
        episode: i32,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SeasonArgs {
    /// TMDB show ID
    pub tmdb_id: i32,
    /// Season number
    pub season: i32,
    /// Show name used in the overview and playback queue
    #[arg(long)]
    pub show_name: Option<String>,
    /// TMDB poster path
    #[arg(long)]
    pub poster: Option<String>,
    /// Keep following watch progress until Ctrl-C
    #[arg(long)]
    pub watch: bool,
    /// Skip the connectivity probe and use downloaded data only
    #[arg(long)]
    pub offline: bool,
}

pub use commands::*;
