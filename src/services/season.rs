//! Season view session.
//!
//! A session loads one season (TMDB, or the offline snapshot when the network
//! is unavailable), reconciles its episodes against the show's Drive folder and
//! the offline overlay, then keeps progress and the last-watched episode up to
//! date from the live watch feeds. Every output is published on a
//! `tokio::sync::watch` channel.

use crate::domain::events::NotificationEvent;
use crate::domain::{QueuePolicy, Resource};
use crate::models::episode::Episode;
use crate::models::season::{SeasonHeader, SeasonResponse};
use crate::models::watched::WatchedEpisode;
use crate::services::folder::{list_season_files, locate_season_folder};
use crate::services::last_watched::resolve_last_watched;
use crate::services::ports::{Connectivity, FileListing, LibraryStore, MetadataSource, WatchStore};
use crate::services::reconcile::{
    FileIndex, build_file_index, reconcile_episodes, resolve_offline_overlay,
};
use crate::services::season_service::SeasonError;
use crate::services::watch_progress::{PlaybackContext, PlaybackQueue, merge_watched};
use futures::StreamExt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

/// Collaborators shared by every session.
#[derive(Clone)]
pub struct SeasonDeps {
    pub metadata: Arc<dyn MetadataSource>,
    pub files: Arc<dyn FileListing>,
    pub library: Arc<dyn LibraryStore>,
    pub watch: Arc<dyn WatchStore>,
    pub connectivity: Arc<dyn Connectivity>,
    pub offline_root: PathBuf,
    pub queue_policy: QueuePolicy,
    pub events: broadcast::Sender<NotificationEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonRequest {
    pub tmdb_id: i32,
    pub show_name: String,
    pub show_poster: Option<String>,
    pub season_number: i32,
}

pub struct SeasonSession {
    deps: SeasonDeps,
    request: SeasonRequest,
    reconciled: Resource<Vec<Episode>>,
    queue: PlaybackQueue,
    header_tx: watch::Sender<Resource<SeasonHeader>>,
    episodes_tx: watch::Sender<Resource<Vec<Episode>>>,
    last_watched_tx: watch::Sender<Option<Episode>>,
}

impl SeasonSession {
    #[must_use]
    pub fn new(deps: SeasonDeps, request: SeasonRequest) -> Self {
        let (header_tx, _) = watch::channel(Resource::Loading);
        let (episodes_tx, _) = watch::channel(Resource::Loading);
        let (last_watched_tx, _) = watch::channel(None);

        Self {
            deps,
            request,
            reconciled: Resource::Loading,
            queue: PlaybackQueue::new(),
            header_tx,
            episodes_tx,
            last_watched_tx,
        }
    }

    /// Creates a session and runs the load chain once.
    pub async fn open(deps: SeasonDeps, request: SeasonRequest) -> Self {
        let mut session = Self::new(deps, request);
        session.load().await;
        session
    }

    /// Loads and reconciles the season. Resets the playback queue.
    pub async fn load(&mut self) {
        self.queue.reset();
        self.reconciled = Resource::Loading;
        self.header_tx.send_replace(Resource::Loading);
        self.episodes_tx.send_replace(Resource::Loading);
        self.last_watched_tx.send_replace(None);

        match self.load_season().await {
            Ok((header, episodes)) => {
                self.header_tx.send_replace(Resource::Success(header));
                self.reconciled = Resource::Success(episodes);
            }
            Err(e) => {
                warn!(
                    tmdb_id = self.request.tmdb_id,
                    season = self.request.season_number,
                    error = %e,
                    "Failed to load season"
                );
                let _ = self.deps.events.send(NotificationEvent::Error {
                    message: e.to_string(),
                });
                self.header_tx.send_replace(Resource::Error(e.to_string()));
                self.reconciled = Resource::Error(e.to_string());
            }
        }

        self.episodes_tx.send_replace(self.reconciled.clone());
    }

    async fn load_season(&self) -> Result<(SeasonHeader, Vec<Episode>), SeasonError> {
        let SeasonRequest {
            tmdb_id,
            season_number,
            ..
        } = self.request;

        let online = self.deps.connectivity.is_online().await;
        let season = if online {
            match self.deps.metadata.get_season(tmdb_id, season_number).await {
                Ok(season) => season,
                Err(e) => {
                    warn!(tmdb_id, season_number, error = %e, "TMDB fetch failed, trying offline copy");
                    self.offline_snapshot()
                        .await?
                        .ok_or_else(|| SeasonError::Upstream(format!("{e:#}")))?
                }
            }
        } else {
            debug!(tmdb_id, season_number, "Offline, using stored season");
            self.offline_snapshot()
                .await?
                .ok_or(SeasonError::NoConnectivity)?
        };

        let header = SeasonHeader::from_season(
            &season,
            &self.request.show_name,
            chrono::Local::now().date_naive(),
        );

        let episodes = season.episodes.unwrap_or_default();
        let _ = self.deps.events.send(NotificationEvent::SeasonLoaded {
            show_id: tmdb_id,
            season_number,
            episodes: episodes.len(),
        });

        if episodes.is_empty() {
            return Ok((header, episodes));
        }

        let overlay =
            resolve_offline_overlay(self.deps.library.as_ref(), tmdb_id, season_number).await?;

        let index = if online { self.season_file_index().await? } else { None };
        let (episodes, stats) = reconcile_episodes(&episodes, &overlay, index.as_ref());

        let _ = self.deps.events.send(NotificationEvent::ReconcileFinished {
            show_id: tmdb_id,
            season_number,
            matched: stats.matched,
            offline: stats.offline,
            total: stats.total,
        });

        Ok((header, episodes))
    }

    async fn offline_snapshot(&self) -> Result<Option<SeasonResponse>, SeasonError> {
        let snapshot = self
            .deps
            .library
            .offline_season(self.request.tmdb_id, self.request.season_number)
            .await?;

        match snapshot {
            Some(snapshot) => Ok(Some(serde_json::from_str(&snapshot.json)?)),
            None => Ok(None),
        }
    }

    /// Index of the show's `Season N` folder. `None` selects default mapping.
    async fn season_file_index(&self) -> Result<Option<FileIndex>, SeasonError> {
        let show = self.deps.library.saved_show(self.request.tmdb_id).await?;

        let Some(root_id) = show.and_then(|s| s.file_id) else {
            debug!(tmdb_id = self.request.tmdb_id, "Show has no Drive folder");
            return Ok(None);
        };

        let files = self.deps.files.as_ref();
        let Some(folder) = locate_season_folder(files, &root_id, self.request.season_number).await
        else {
            return Ok(None);
        };

        match list_season_files(files, &folder.id).await {
            Ok(listing) => Ok(Some(build_file_index(&listing))),
            Err(e) => {
                warn!(folder_id = %folder.id, error = %e, "Failed to list season files");
                Ok(None)
            }
        }
    }

    fn playback_context(&self) -> PlaybackContext {
        PlaybackContext {
            tmdb_id: self.request.tmdb_id,
            title: self.request.show_name.clone(),
            poster_path: self.request.show_poster.clone(),
            offline_root: self.deps.offline_root.clone(),
        }
    }

    /// Merges watch rows into the reconciled episodes and grows the queue.
    pub fn apply_watched(&mut self, watched: &[WatchedEpisode]) {
        let (merged, addendum) = merge_watched(&self.reconciled, watched, &self.playback_context());
        self.queue.extend(addendum, self.deps.queue_policy);
        self.episodes_tx.send_replace(merged);
    }

    pub fn apply_last_watched(&mut self, last: Option<&WatchedEpisode>) {
        let resolved = self
            .reconciled
            .data()
            .and_then(|episodes| resolve_last_watched(episodes, last));
        self.last_watched_tx.send_replace(resolved);
    }

    /// One-shot merge of the current watch state, for callers that do not
    /// follow the live feeds.
    pub async fn refresh(&mut self) -> Result<(), SeasonError> {
        let SeasonRequest {
            tmdb_id,
            season_number,
            ..
        } = self.request;

        let watched = self.deps.watch.watched_season(tmdb_id, season_number).await?;
        self.apply_watched(&watched);

        let last = self
            .deps
            .watch
            .last_watched_episode(tmdb_id, season_number)
            .await?;
        self.apply_last_watched(last.as_ref());
        Ok(())
    }

    /// Follows the live watch feeds until both close or `shutdown` resolves.
    pub async fn run(&mut self, shutdown: impl Future<Output = ()>) {
        if !self.reconciled.is_success() {
            debug!("Season not loaded, not following watch feeds");
            return;
        }

        let SeasonRequest {
            tmdb_id,
            season_number,
            ..
        } = self.request;

        let mut watched = self.deps.watch.watched_season_live(tmdb_id, season_number);
        let mut last = self.deps.watch.last_watched_live(tmdb_id, season_number);
        let mut watched_open = true;
        let mut last_open = true;

        tokio::pin!(shutdown);

        while watched_open || last_open {
            tokio::select! {
                () = &mut shutdown => {
                    info!(tmdb_id, season_number, "Season session stopped");
                    break;
                }
                rows = watched.next(), if watched_open => match rows {
                    Some(rows) => self.apply_watched(&rows),
                    None => watched_open = false,
                },
                row = last.next(), if last_open => match row {
                    Some(row) => self.apply_last_watched(row.as_ref()),
                    None => last_open = false,
                },
            }
        }
    }

    #[must_use]
    pub fn request(&self) -> &SeasonRequest {
        &self.request
    }

    #[must_use]
    pub fn header(&self) -> Resource<SeasonHeader> {
        self.header_tx.borrow().clone()
    }

    #[must_use]
    pub fn episodes(&self) -> Resource<Vec<Episode>> {
        self.episodes_tx.borrow().clone()
    }

    #[must_use]
    pub fn last_watched(&self) -> Option<Episode> {
        self.last_watched_tx.borrow().clone()
    }

    #[must_use]
    pub fn queue(&self) -> &PlaybackQueue {
        &self.queue
    }

    #[must_use]
    pub fn subscribe_episodes(&self) -> watch::Receiver<Resource<Vec<Episode>>> {
        self.episodes_tx.subscribe()
    }

    #[must_use]
    pub fn subscribe_last_watched(&self) -> watch::Receiver<Option<Episode>> {
        self.last_watched_tx.subscribe()
    }
}
