use crate::constants::limits::{WATCH_EVENT_BUFFER, WATCH_POLL_INTERVAL_MS};
use crate::models::offline::{OfflineEpisode, OfflineSeason, OfflineShow};
use crate::models::show::SavedShow;
use crate::models::watched::WatchedEpisode;
use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::info;

pub mod live;
pub mod migrator;
pub mod repositories;

/// Change notification emitted after a watched row is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchedChange {
    pub tmdb_id: i32,
    pub season_number: i32,
    pub episode_number: i32,
}

impl WatchedChange {
    #[must_use]
    pub const fn is_for(&self, tmdb_id: i32, season_number: i32) -> bool {
        self.tmdb_id == tmdb_id && self.season_number == season_number
    }
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
    watch_events: broadcast::Sender<WatchedChange>,
    watch_poll: Duration,
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

        if !db_url.starts_with(":memory:") {
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

        let (watch_events, _) = broadcast::channel(WATCH_EVENT_BUFFER);

        Ok(Self {
            conn,
            watch_events,
            watch_poll: Duration::from_millis(WATCH_POLL_INTERVAL_MS),
        })
    }

    /// Sets how often live watch feeds re-read the database. Zero keeps the
    /// current interval.
    #[must_use]
    pub fn with_watch_poll_interval(mut self, every: Duration) -> Self {
        if !every.is_zero() {
            self.watch_poll = every;
        }
        self
    }

    #[must_use]
    pub const fn watch_poll_interval(&self) -> Duration {
        self.watch_poll
    }

    fn show_repo(&self) -> repositories::show::ShowRepository {
        repositories::show::ShowRepository::new(self.conn.clone())
    }

    fn offline_repo(&self) -> repositories::offline::OfflineRepository {
        repositories::offline::OfflineRepository::new(self.conn.clone())
    }

    fn watched_repo(&self) -> repositories::watched::WatchedRepository {
        repositories::watched::WatchedRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Saved shows
    // ========================================================================

    pub async fn get_saved_show(&self, tmdb_id: i32) -> Result<Option<SavedShow>> {
        self.show_repo().get(tmdb_id).await
    }

    pub async fn list_saved_shows(&self) -> Result<Vec<SavedShow>> {
        self.show_repo().list().await
    }

    pub async fn save_show(&self, show: &SavedShow) -> Result<()> {
        self.show_repo().upsert(show).await
    }

    // ========================================================================
    // Offline groupings
    // ========================================================================

    pub async fn get_offline_episodes(
        &self,
        tmdb_id: i32,
        season_number: i32,
    ) -> Result<Vec<OfflineEpisode>> {
        self.offline_repo().episodes(tmdb_id, season_number).await
    }

    pub async fn add_offline_episode(&self, episode: &OfflineEpisode) -> Result<()> {
        self.offline_repo().upsert_episode(episode).await
    }

    pub async fn remove_offline_episode(
        &self,
        tmdb_id: i32,
        season_number: i32,
        episode_number: i32,
    ) -> Result<bool> {
        self.offline_repo()
            .delete_episode(tmdb_id, season_number, episode_number)
            .await
    }

    pub async fn get_offline_season(
        &self,
        tmdb_id: i32,
        season_number: i32,
    ) -> Result<Option<OfflineSeason>> {
        self.offline_repo().season(tmdb_id, season_number).await
    }

    pub async fn get_offline_seasons(&self, tmdb_id: i32) -> Result<Vec<OfflineSeason>> {
        self.offline_repo().seasons(tmdb_id).await
    }

    pub async fn add_offline_season(&self, season: &OfflineSeason) -> Result<()> {
        self.offline_repo().upsert_season(season).await
    }

    pub async fn remove_offline_season(&self, tmdb_id: i32, season_number: i32) -> Result<bool> {
        self.offline_repo()
            .delete_season(tmdb_id, season_number)
            .await
    }

    pub async fn list_offline_shows(&self) -> Result<Vec<OfflineShow>> {
        self.offline_repo().shows().await
    }

    pub async fn add_offline_show(&self, show: &OfflineShow) -> Result<()> {
        self.offline_repo().upsert_show(show).await
    }

    pub async fn remove_offline_show(&self, tmdb_id: i32) -> Result<bool> {
        self.offline_repo().delete_show(tmdb_id).await
    }

    // ========================================================================
    // Watch progress
    // ========================================================================

    pub async fn get_watched_season(
        &self,
        tmdb_id: i32,
        season_number: i32,
    ) -> Result<Vec<WatchedEpisode>> {
        self.watched_repo().season(tmdb_id, season_number).await
    }

    pub async fn get_last_watched(
        &self,
        tmdb_id: i32,
        season_number: i32,
    ) -> Result<Option<WatchedEpisode>> {
        self.watched_repo()
            .last_watched(tmdb_id, season_number)
            .await
    }

    pub async fn record_watched(&self, watched: &WatchedEpisode) -> Result<()> {
        self.watched_repo().upsert(watched).await?;

        // No subscribers is fine.
        let _ = self.watch_events.send(WatchedChange {
            tmdb_id: watched.tmdb_id,
            season_number: watched.season_number,
            episode_number: watched.episode_number,
        });

        Ok(())
    }

    #[must_use]
    pub fn subscribe_watched(&self) -> broadcast::Receiver<WatchedChange> {
        self.watch_events.subscribe()
    }
}
