use crate::services::ports::LibraryStore;
use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

/// Which offline groupings a removal deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OfflineRemoval {
    pub episode: bool,
    pub season: bool,
    pub show: bool,
}

/// Deletes a downloaded episode and cascades upward.
///
/// The episode row and its file go first. The season grouping is removed once
/// it has no episodes left, and the show grouping once it has no seasons left.
/// A backing file that is already gone is not an error.
pub async fn remove_offline_episode(
    library: &dyn LibraryStore,
    tmdb_id: i32,
    season_number: i32,
    episode_number: i32,
) -> Result<OfflineRemoval> {
    let mut removal = OfflineRemoval::default();

    let episodes = library.offline_episodes(tmdb_id, season_number).await?;
    let Some(record) = episodes
        .iter()
        .find(|e| e.episode_number == episode_number)
    else {
        debug!(tmdb_id, season_number, episode_number, "No offline record to remove");
        return Ok(removal);
    };

    removal.episode = library
        .delete_offline_episode(tmdb_id, season_number, episode_number)
        .await?;
    remove_file_if_present(Path::new(&record.file_path)).await?;

    if library
        .offline_episodes(tmdb_id, season_number)
        .await?
        .is_empty()
    {
        removal.season = library
            .delete_offline_season(tmdb_id, season_number)
            .await?;

        if library.offline_seasons(tmdb_id).await?.is_empty() {
            removal.show = library.delete_offline_show(tmdb_id).await?;
        }
    }

    info!(
        tmdb_id,
        season_number,
        episode_number,
        season_removed = removal.season,
        show_removed = removal.show,
        "Removed offline episode"
    );
    Ok(removal)
}

async fn remove_file_if_present(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Offline file already gone: {}", path.display());
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to delete {}", path.display())),
    }
}
