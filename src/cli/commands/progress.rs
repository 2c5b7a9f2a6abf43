use crate::config::Config;
use crate::models::watched::WatchedEpisode;
use crate::services::ports::WatchStore;

pub async fn cmd_progress(
    config: &Config,
    tmdb_id: i32,
    season_number: i32,
    episode_number: i32,
    watched_ms: i64,
    total_ms: i64,
) -> anyhow::Result<()> {
    if total_ms <= 0 {
        println!("Runtime must be greater than zero.");
        return Ok(());
    }

    let store = super::open_store(config).await?;
    let watched = WatchedEpisode {
        tmdb_id,
        season_number,
        episode_number,
        watched_duration: watched_ms,
        total_duration: total_ms,
        updated_at: chrono::Utc::now().to_rfc3339(),
    };
    store.upsert_progress(&watched).await?;

    println!(
        "✓ S{:02}E{:02} at {}%",
        season_number,
        episode_number,
        watched.watch_progress()
    );
    Ok(())
}
