//! End-to-end tests for the season view chain over a real SQLite store.

use anyhow::{Result, bail};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use zplex::clients::connectivity::StaticConnectivity;
use zplex::clients::drive::DriveQuery;
use zplex::db::Store;
use zplex::domain::{QueuePolicy, Resource};
use zplex::models::drive::DriveFile;
use zplex::models::episode::Episode;
use zplex::models::offline::{OfflineEpisode, OfflineSeason};
use zplex::models::season::SeasonResponse;
use zplex::models::show::SavedShow;
use zplex::models::watched::WatchedEpisode;
use zplex::services::ports::{FileListing, MetadataSource, WatchStore};
use zplex::services::{SeasonDeps, SeasonRequest, SeasonSession};

const SHOW_ID: i32 = 1399;
const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

fn temp_db_url() -> String {
    let db_path =
        std::env::temp_dir().join(format!("zplex-season-test-{}.db", uuid::Uuid::new_v4()));
    format!("sqlite:{}", db_path.display())
}

async fn temp_store() -> Store {
    Store::new(&temp_db_url())
        .await
        .expect("failed to open store")
}

fn season_response() -> SeasonResponse {
    SeasonResponse {
        id: Some(3624),
        episodes: Some(vec![Episode::new(1, 1, "Pilot"), Episode::new(1, 2, "Next")]),
        season_number: 1,
        name: Some("Season 1".to_string()),
        poster_path: None,
        overview: None,
        air_date: Some("2011-04-17".to_string()),
    }
}

struct FakeTmdb {
    season: Option<SeasonResponse>,
}

#[async_trait::async_trait]
impl MetadataSource for FakeTmdb {
    async fn get_season(&self, _tmdb_id: i32, _season_number: i32) -> Result<SeasonResponse> {
        match &self.season {
            Some(season) => Ok(season.clone()),
            None => bail!("TMDB API error: 503 Service Unavailable"),
        }
    }
}

/// Show root `root` holds `Season 1` (`season1`), which holds one episode file.
struct FakeDrive;

#[async_trait::async_trait]
impl FileListing for FakeDrive {
    async fn list_files(&self, query: &DriveQuery) -> Result<Vec<DriveFile>> {
        let q = query.build();
        if q.contains("'root' in parents") {
            return Ok(vec![
                DriveFile::new("season1", "Season 1").with_mime_type(FOLDER_MIME),
            ]);
        }
        if q.contains("'season1' in parents") {
            return Ok(vec![
                DriveFile::new("remote-e2", "Show - S01E02.mkv")
                    .with_mime_type("video/x-matroska")
                    .with_size(734_003_200),
                DriveFile::new("notes", "notes.txt").with_mime_type("text/plain"),
            ]);
        }
        Ok(Vec::new())
    }
}

/// Finds `Season 1` under `root` but fails to list its contents.
struct BrokenSeasonDrive;

#[async_trait::async_trait]
impl FileListing for BrokenSeasonDrive {
    async fn list_files(&self, query: &DriveQuery) -> Result<Vec<DriveFile>> {
        let q = query.build();
        if q.contains("'season1' in parents") {
            bail!("Drive API error: 500 Internal Server Error");
        }
        FakeDrive.list_files(query).await
    }
}

fn deps(store: &Store, online: bool, season: Option<SeasonResponse>) -> SeasonDeps {
    deps_with_files(store, online, season, Arc::new(FakeDrive))
}

fn deps_with_files(
    store: &Store,
    online: bool,
    season: Option<SeasonResponse>,
    files: Arc<dyn FileListing>,
) -> SeasonDeps {
    let (events, _) = broadcast::channel(32);
    SeasonDeps {
        metadata: Arc::new(FakeTmdb { season }),
        files,
        library: Arc::new(store.clone()),
        watch: Arc::new(store.clone()),
        connectivity: Arc::new(StaticConnectivity(online)),
        offline_root: std::env::temp_dir().join("zplex-offline"),
        queue_policy: QueuePolicy::Accumulate,
        events,
    }
}

fn request() -> SeasonRequest {
    SeasonRequest {
        tmdb_id: SHOW_ID,
        show_name: "Game of Thrones".to_string(),
        show_poster: None,
        season_number: 1,
    }
}

fn offline_path(name: &str) -> String {
    std::env::temp_dir()
        .join("zplex-offline")
        .join(name)
        .display()
        .to_string()
}

async fn seed_library(store: &Store) {
    store
        .save_show(&SavedShow {
            tmdb_id: SHOW_ID,
            name: "Game of Thrones".to_string(),
            poster_path: None,
            file_id: Some("root".to_string()),
        })
        .await
        .unwrap();

    store
        .add_offline_episode(&OfflineEpisode {
            tmdb_id: SHOW_ID,
            season_number: 1,
            episode_number: 1,
            file_path: offline_path("e1.mkv"),
        })
        .await
        .unwrap();
}

fn watched(episode: i32, position: i64, total: i64, at: &str) -> WatchedEpisode {
    WatchedEpisode {
        tmdb_id: SHOW_ID,
        season_number: 1,
        episode_number: episode,
        watched_duration: position,
        total_duration: total,
        updated_at: at.to_string(),
    }
}

#[tokio::test]
async fn test_online_session_reconciles_offline_and_drive() {
    let store = temp_store().await;
    seed_library(&store).await;

    let session = SeasonSession::open(deps(&store, true, Some(season_response())), request()).await;

    let Resource::Success(episodes) = session.episodes() else {
        panic!("expected success, got {:?}", session.episodes());
    };
    assert_eq!(episodes.len(), 2);

    assert_eq!(episodes[0].file_id.as_deref(), Some(offline_path("e1.mkv").as_str()));
    assert!(episodes[0].offline);

    assert_eq!(episodes[1].file_id.as_deref(), Some("remote-e2"));
    assert!(!episodes[1].offline);
    assert_eq!(episodes[1].file_size.as_deref(), Some("700.00 MiB"));

    let header = session.header();
    let header = header.data().expect("header loaded");
    assert_eq!(header.season_number, "Season 1");
    assert_eq!(
        header.season_overview,
        "Season 1 of Game of Thrones with 2 episodes premiered on April 17, 2011"
    );
}

#[tokio::test]
async fn test_refresh_merges_progress_and_accumulates_queue() {
    let store = temp_store().await;
    seed_library(&store).await;

    let mut session =
        SeasonSession::open(deps(&store, true, Some(season_response())), request()).await;

    session.refresh().await.unwrap();
    assert_eq!(session.queue().len(), 2);
    assert!(session.queue().items()[0].offline);
    assert!(!session.queue().items()[1].offline);

    store
        .record_watched(&watched(2, 600_000, 1_200_000, "2026-03-01T20:00:00Z"))
        .await
        .unwrap();
    session.refresh().await.unwrap();

    let episodes = session.episodes();
    let progress: Vec<i32> = episodes.data().unwrap().iter().map(|e| e.progress).collect();
    assert_eq!(progress, vec![0, 50]);
    assert_eq!(session.queue().len(), 4);

    let resume = session.last_watched().expect("resumable episode");
    assert_eq!(resume.episode_number, 2);

    session.load().await;
    assert!(session.queue().is_empty());
}

#[tokio::test]
async fn test_missing_season_folder_uses_default_mapping() {
    let store = temp_store().await;
    seed_library(&store).await;

    let mut req = request();
    req.season_number = 3;

    store
        .add_offline_episode(&OfflineEpisode {
            tmdb_id: SHOW_ID,
            season_number: 3,
            episode_number: 2,
            file_path: offline_path("s3e2.mkv"),
        })
        .await
        .unwrap();

    let mut tmdb_season = season_response();
    tmdb_season.season_number = 3;
    tmdb_season.episodes = Some(vec![Episode::new(3, 1, "One"), Episode::new(3, 2, "Two")]);

    let session = SeasonSession::open(deps(&store, true, Some(tmdb_season)), req).await;
    let episodes = session.episodes();
    let episodes = episodes.data().unwrap();

    assert_eq!(episodes[0].file_id, None);
    assert!(episodes[1].offline);
}

#[tokio::test]
async fn test_season_listing_failure_uses_default_mapping() {
    let store = temp_store().await;
    seed_library(&store).await;

    let deps = deps_with_files(
        &store,
        true,
        Some(season_response()),
        Arc::new(BrokenSeasonDrive),
    );
    let session = SeasonSession::open(deps, request()).await;

    let episodes = session.episodes();
    let episodes = episodes.data().expect("listing failure is not fatal");
    assert_eq!(episodes[0].file_id.as_deref(), Some(offline_path("e1.mkv").as_str()));
    assert!(episodes[0].offline);
    assert_eq!(episodes[1].file_id, None);
    assert_eq!(episodes[1].file_size, None);
}

#[tokio::test]
async fn test_offline_session_uses_snapshot() {
    let store = temp_store().await;
    seed_library(&store).await;
    store
        .add_offline_season(&OfflineSeason {
            tmdb_id: SHOW_ID,
            season_number: 1,
            json: serde_json::to_string(&season_response()).unwrap(),
        })
        .await
        .unwrap();

    let session = SeasonSession::open(deps(&store, false, None), request()).await;

    let episodes = session.episodes();
    let episodes = episodes.data().expect("snapshot loaded");
    assert!(episodes[0].offline);
    // Drive is not consulted without connectivity.
    assert_eq!(episodes[1].file_id, None);
}

#[tokio::test]
async fn test_offline_session_without_snapshot_errors() {
    let store = temp_store().await;

    let session = SeasonSession::open(deps(&store, false, None), request()).await;

    assert_eq!(
        session.episodes(),
        Resource::Error("No internet connection".to_string())
    );
    assert!(session.header().error().is_some());
    assert!(session.queue().is_empty());
}

#[tokio::test]
async fn test_tmdb_failure_falls_back_to_snapshot() {
    let store = temp_store().await;
    let session = SeasonSession::open(deps(&store, true, None), request()).await;
    let message = session.episodes().error().map(str::to_string);
    assert!(message.unwrap().contains("503"));

    store
        .add_offline_season(&OfflineSeason {
            tmdb_id: SHOW_ID,
            season_number: 1,
            json: serde_json::to_string(&season_response()).unwrap(),
        })
        .await
        .unwrap();

    let session = SeasonSession::open(deps(&store, true, None), request()).await;
    assert!(session.episodes().is_success());
}

#[tokio::test]
async fn test_malformed_snapshot_is_conversion_error() {
    let store = temp_store().await;
    store
        .add_offline_season(&OfflineSeason {
            tmdb_id: SHOW_ID,
            season_number: 1,
            json: "{not json".to_string(),
        })
        .await
        .unwrap();

    let session = SeasonSession::open(deps(&store, false, None), request()).await;
    let message = session.episodes().error().map(str::to_string).unwrap();
    assert!(message.starts_with("Invalid season data"));
}

#[tokio::test]
async fn test_empty_season_is_empty_success() {
    let store = temp_store().await;
    let mut season = season_response();
    season.episodes = None;

    let session = SeasonSession::open(deps(&store, true, Some(season)), request()).await;
    assert_eq!(session.episodes(), Resource::Success(Vec::new()));
}

#[tokio::test]
async fn test_live_feed_updates_progress() {
    let store = temp_store().await;
    seed_library(&store).await;

    let mut session =
        SeasonSession::open(deps(&store, true, Some(season_response())), request()).await;
    let mut episodes_rx = session.subscribe_episodes();
    let mut last_rx = session.subscribe_last_watched();

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        session
            .run(async {
                let _ = stop_rx.await;
            })
            .await;
        session
    });

    store
        .record_watched(&watched(1, 900_000, 1_000_000, "2026-03-02T21:00:00Z"))
        .await
        .unwrap();

    let reached = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if episodes_rx.changed().await.is_err() {
                return false;
            }
            let current = episodes_rx.borrow_and_update().clone();
            if current.data().is_some_and(|list| list[0].progress == 90) {
                return true;
            }
        }
    })
    .await
    .unwrap_or(false);
    assert!(reached, "progress update never arrived");

    let resumed = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Some(episode) = last_rx.borrow_and_update().clone() {
                return Some(episode.episode_number);
            }
            if last_rx.changed().await.is_err() {
                return None;
            }
        }
    })
    .await
    .unwrap_or(None);
    assert_eq!(resumed, Some(1));

    stop_tx.send(()).unwrap();
    let session = handle.await.unwrap();
    assert!(session.queue().len() >= 2);
    assert_eq!(session.queue().len() % 2, 0);
}

#[tokio::test]
async fn test_live_feed_sees_writes_from_another_handle() {
    let url = temp_db_url();
    let viewer = Store::new(&url)
        .await
        .unwrap()
        .with_watch_poll_interval(Duration::from_millis(100));
    let writer = Store::new(&url).await.unwrap();

    let mut feed = viewer.watched_season_live(SHOW_ID, 1);
    let mut last_feed = viewer.last_watched_live(SHOW_ID, 1);

    let initial = feed.next().await.unwrap();
    assert!(initial.is_empty());
    assert_eq!(last_feed.next().await.unwrap(), None);

    writer
        .upsert_progress(&watched(2, 300_000, 1_200_000, "2026-03-03T19:00:00Z"))
        .await
        .unwrap();

    let rows = tokio::time::timeout(Duration::from_secs(3), feed.next())
        .await
        .expect("write from another handle never observed")
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].watch_progress(), 25);

    let last = tokio::time::timeout(Duration::from_secs(3), last_feed.next())
        .await
        .expect("last watched never updated")
        .unwrap();
    assert_eq!(last.map(|w| w.episode_number), Some(2));
}
