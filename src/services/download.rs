//! Offline downloads.
//!
//! [`DownloadQueue::enqueue`] hands a request to a bounded channel and returns
//! immediately. A single [`DownloadWorker`] drains the channel, streams each
//! file into the offline directory and records the show, season snapshot and
//! episode rows that make the episode playable without connectivity.

use crate::constants::DEFAULT_VIDEO_EXTENSION;
use crate::domain::events::NotificationEvent;
use crate::models::offline::{OfflineEpisode, OfflineSeason, OfflineShow};
use crate::services::ports::{FileDownloader, LibraryStore, MetadataSource};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub tmdb_id: i32,
    pub show_name: String,
    pub show_poster: Option<String>,
    pub season_number: i32,
    pub episode_number: i32,
    /// Remote id of the episode file. Requests without one are refused.
    pub file_id: Option<String>,
    pub title: String,
    pub extension: Option<String>,
}

impl DownloadRequest {
    /// Local destination: `<root>/<show>/<season>/<file_id>.<ext>`.
    #[must_use]
    pub fn destination(&self, offline_root: &Path, file_id: &str) -> PathBuf {
        let extension = self
            .extension
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or(DEFAULT_VIDEO_EXTENSION);

        offline_root
            .join(self.tmdb_id.to_string())
            .join(self.season_number.to_string())
            .join(format!("{file_id}.{extension}"))
    }
}

/// Sending half of the download channel.
#[derive(Clone)]
pub struct DownloadQueue {
    tx: mpsc::Sender<DownloadRequest>,
    events: broadcast::Sender<NotificationEvent>,
}

impl DownloadQueue {
    #[must_use]
    pub fn new(
        capacity: usize,
        events: broadcast::Sender<NotificationEvent>,
    ) -> (Self, mpsc::Receiver<DownloadRequest>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx, events }, rx)
    }

    /// Queues a download without waiting for it. Returns whether it was accepted.
    pub fn enqueue(&self, request: DownloadRequest) -> bool {
        if request.file_id.is_none() {
            warn!(
                tmdb_id = request.tmdb_id,
                season = request.season_number,
                episode = request.episode_number,
                "Refusing download without a file id"
            );
            return false;
        }

        let title = request.title.clone();
        match self.tx.try_send(request) {
            Ok(()) => {
                info!("Queued download: {}", title);
                let _ = self.events.send(NotificationEvent::DownloadQueued { title });
                true
            }
            Err(e) => {
                warn!("Failed to queue download {}: {}", title, e);
                false
            }
        }
    }
}

#[derive(Clone)]
pub struct DownloadWorker {
    downloader: Arc<dyn FileDownloader>,
    metadata: Arc<dyn MetadataSource>,
    library: Arc<dyn LibraryStore>,
    offline_root: PathBuf,
    events: broadcast::Sender<NotificationEvent>,
}

impl DownloadWorker {
    #[must_use]
    pub fn new(
        downloader: Arc<dyn FileDownloader>,
        metadata: Arc<dyn MetadataSource>,
        library: Arc<dyn LibraryStore>,
        offline_root: PathBuf,
        events: broadcast::Sender<NotificationEvent>,
    ) -> Self {
        Self {
            downloader,
            metadata,
            library,
            offline_root,
            events,
        }
    }

    pub fn spawn(self, rx: mpsc::Receiver<DownloadRequest>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(rx).await })
    }

    /// Processes requests until every queue handle is dropped.
    pub async fn run(self, mut rx: mpsc::Receiver<DownloadRequest>) {
        info!("Download worker started");

        while let Some(request) = rx.recv().await {
            let title = request.title.clone();
            match self.process(&request).await {
                Ok(path) => {
                    metrics::counter!("zplex_downloads_total", "result" => "success").increment(1);
                    info!("Downloaded {} to {}", title, path.display());
                    let _ = self.events.send(NotificationEvent::DownloadFinished {
                        title,
                        path: path.display().to_string(),
                    });
                }
                Err(e) => {
                    metrics::counter!("zplex_downloads_total", "result" => "failure").increment(1);
                    error!("Download of {} failed: {:#}", title, e);
                    let _ = self.events.send(NotificationEvent::DownloadFailed {
                        title,
                        message: format!("{e:#}"),
                    });
                }
            }
        }

        info!("Download worker stopped");
    }

    pub async fn process(&self, request: &DownloadRequest) -> Result<PathBuf> {
        let file_id = request
            .file_id
            .as_deref()
            .context("Download request has no file id")?;

        let season = self
            .metadata
            .get_season(request.tmdb_id, request.season_number)
            .await
            .context("Failed to fetch season snapshot")?;
        let snapshot = serde_json::to_string(&season)?;

        let dest = request.destination(&self.offline_root, file_id);
        let bytes = self.downloader.download(file_id, &dest).await?;
        info!(bytes, "Saved {}", dest.display());

        self.library
            .upsert_offline_show(&OfflineShow {
                tmdb_id: request.tmdb_id,
                name: request.show_name.clone(),
                poster_path: request.show_poster.clone(),
            })
            .await?;

        self.library
            .upsert_offline_season(&OfflineSeason {
                tmdb_id: request.tmdb_id,
                season_number: request.season_number,
                json: snapshot,
            })
            .await?;

        self.library
            .upsert_offline_episode(&OfflineEpisode {
                tmdb_id: request.tmdb_id,
                season_number: request.season_number,
                episode_number: request.episode_number,
                file_path: dest.to_string_lossy().into_owned(),
            })
            .await?;

        Ok(dest)
    }
}
