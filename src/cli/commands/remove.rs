use crate::config::Config;
use crate::services::remove_offline_episode;

pub async fn cmd_remove_offline(
    config: &Config,
    tmdb_id: i32,
    season_number: i32,
    episode_number: i32,
) -> anyhow::Result<()> {
    let store = super::open_store(config).await?;
    let removal = remove_offline_episode(&store, tmdb_id, season_number, episode_number).await?;

    if !removal.episode {
        println!("S{season_number:02}E{episode_number:02} of show {tmdb_id} is not downloaded.");
        return Ok(());
    }

    println!("✓ Removed S{season_number:02}E{episode_number:02}");
    if removal.season {
        println!("  Season {season_number} has no downloads left");
    }
    if removal.show {
        println!("  Show {tmdb_id} has no downloads left");
    }
    Ok(())
}
