//! Collaborator seams consumed by the season pipeline.
//!
//! The reconciliation and merge stages only ever talk to these traits, so the
//! HTTP clients and the SQLite store can be swapped for in-memory fakes.

use crate::clients::drive::DriveQuery;
use crate::models::drive::DriveFile;
use crate::models::offline::{OfflineEpisode, OfflineSeason, OfflineShow};
use crate::models::season::SeasonResponse;
use crate::models::show::SavedShow;
use crate::models::watched::WatchedEpisode;
use anyhow::Result;
use futures::stream::BoxStream;
use std::path::Path;

/// Show/season metadata provider (TMDB).
#[async_trait::async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fetches one season with its episode list.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-2xx responses and malformed payloads.
    async fn get_season(&self, tmdb_id: i32, season_number: i32) -> Result<SeasonResponse>;
}

/// Cloud-drive folder listing.
#[async_trait::async_trait]
pub trait FileListing: Send + Sync {
    /// Lists every entry matching `query`, following pagination.
    ///
    /// # Errors
    ///
    /// Fails on transport errors and non-2xx responses.
    async fn list_files(&self, query: &DriveQuery) -> Result<Vec<DriveFile>>;
}

/// Streams remote file content to local storage.
#[async_trait::async_trait]
pub trait FileDownloader: Send + Sync {
    /// Writes the content of `file_id` to `dest`, returning the byte count.
    async fn download(&self, file_id: &str, dest: &Path) -> Result<u64>;
}

/// Saved shows and the offline (downloaded) grouping tables.
#[async_trait::async_trait]
pub trait LibraryStore: Send + Sync {
    async fn saved_show(&self, tmdb_id: i32) -> Result<Option<SavedShow>>;

    async fn offline_episodes(&self, tmdb_id: i32, season_number: i32)
    -> Result<Vec<OfflineEpisode>>;

    async fn upsert_offline_episode(&self, episode: &OfflineEpisode) -> Result<()>;

    async fn delete_offline_episode(
        &self,
        tmdb_id: i32,
        season_number: i32,
        episode_number: i32,
    ) -> Result<bool>;

    async fn offline_season(&self, tmdb_id: i32, season_number: i32)
    -> Result<Option<OfflineSeason>>;

    async fn offline_seasons(&self, tmdb_id: i32) -> Result<Vec<OfflineSeason>>;

    async fn upsert_offline_season(&self, season: &OfflineSeason) -> Result<()>;

    async fn delete_offline_season(&self, tmdb_id: i32, season_number: i32) -> Result<bool>;

    async fn upsert_offline_show(&self, show: &OfflineShow) -> Result<()>;

    async fn delete_offline_show(&self, tmdb_id: i32) -> Result<bool>;
}

/// Per-episode playback state with push-updated feeds.
#[async_trait::async_trait]
pub trait WatchStore: Send + Sync {
    async fn watched_season(&self, tmdb_id: i32, season_number: i32)
    -> Result<Vec<WatchedEpisode>>;

    /// Current rows of the season, re-emitted after every change to it.
    fn watched_season_live(
        &self,
        tmdb_id: i32,
        season_number: i32,
    ) -> BoxStream<'static, Vec<WatchedEpisode>>;

    async fn last_watched_episode(
        &self,
        tmdb_id: i32,
        season_number: i32,
    ) -> Result<Option<WatchedEpisode>>;

    /// Latest most-recently-watched row of the season, re-emitted on change.
    fn last_watched_live(
        &self,
        tmdb_id: i32,
        season_number: i32,
    ) -> BoxStream<'static, Option<WatchedEpisode>>;

    /// Records a playback position and notifies live subscribers.
    async fn upsert_progress(&self, watched: &WatchedEpisode) -> Result<()>;
}

/// Network reachability probe.
#[async_trait::async_trait]
pub trait Connectivity: Send + Sync {
    async fn is_online(&self) -> bool;
}
