pub mod ports;
pub use ports::{Connectivity, FileDownloader, FileListing, LibraryStore, MetadataSource, WatchStore};

pub mod reconcile;
pub use reconcile::{
    EpisodeSource, FileIndex, OfflineOverlay, ReconcileStats, build_file_index,
    build_offline_overlay, reconcile_episodes, resolve_offline_overlay,
};

pub mod folder;
pub use folder::{list_season_files, locate_season_folder, season_folder_name};

pub mod watch_progress;
pub use watch_progress::{PlaybackContext, PlaybackQueue, merge_watched};

pub mod last_watched;
pub use last_watched::resolve_last_watched;

pub mod season_service;
pub use season_service::SeasonError;

pub mod season;
pub use season::{SeasonDeps, SeasonRequest, SeasonSession};

pub mod offline;
pub use offline::{OfflineRemoval, remove_offline_episode};

pub mod download;
pub use download::{DownloadQueue, DownloadRequest, DownloadWorker};
