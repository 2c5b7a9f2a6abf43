use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

use crate::clients::connectivity::{HttpConnectivity, StaticConnectivity};
use crate::clients::drive::DriveClient;
use crate::clients::tmdb::TmdbClient;
use crate::config::Config;
use crate::db::Store;
use crate::domain::events::NotificationEvent;
use crate::services::ports::Connectivity;
use crate::services::{DownloadWorker, SeasonDeps};

#[derive(Clone)]
pub struct SharedState {
    pub config: Config,

    pub store: Store,

    pub tmdb: Arc<TmdbClient>,

    pub drive: Arc<DriveClient>,

    pub connectivity: Arc<dyn Connectivity>,

    pub event_bus: broadcast::Sender<NotificationEvent>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let connectivity: Arc<dyn Connectivity> =
            Arc::new(HttpConnectivity::new(&config.library)?);
        Self::with_connectivity(config, connectivity).await
    }

    /// Builds the state with a fixed connectivity answer, for offline use.
    pub async fn offline(config: Config) -> anyhow::Result<Self> {
        Self::with_connectivity(config, Arc::new(StaticConnectivity(false))).await
    }

    async fn with_connectivity(
        config: Config,
        connectivity: Arc<dyn Connectivity>,
    ) -> anyhow::Result<Self> {
        let (event_bus, _) = broadcast::channel(config.general.event_bus_buffer_size);

        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?
        .with_watch_poll_interval(Duration::from_millis(
            config.general.watch_poll_interval_ms,
        ));

        let tmdb = Arc::new(TmdbClient::new(&config.tmdb)?);
        let drive = Arc::new(DriveClient::new(&config.drive)?);

        Ok(Self {
            config,
            store,
            tmdb,
            drive,
            connectivity,
            event_bus,
        })
    }

    #[must_use]
    pub fn season_deps(&self) -> SeasonDeps {
        SeasonDeps {
            metadata: self.tmdb.clone(),
            files: self.drive.clone(),
            library: Arc::new(self.store.clone()),
            watch: Arc::new(self.store.clone()),
            connectivity: self.connectivity.clone(),
            offline_root: self.config.offline_root(),
            queue_policy: self.config.playback.queue_policy,
            events: self.event_bus.clone(),
        }
    }

    #[must_use]
    pub fn download_worker(&self) -> DownloadWorker {
        DownloadWorker::new(
            self.drive.clone(),
            self.tmdb.clone(),
            Arc::new(self.store.clone()),
            self.config.offline_root(),
            self.event_bus.clone(),
        )
    }
}
