use crate::config::Config;
use crate::constants::limits::DOWNLOAD_QUEUE_CAPACITY;
use crate::domain::Resource;
use crate::domain::events::NotificationEvent;
use crate::services::{DownloadQueue, DownloadRequest};
use crate::state::SharedState;

pub async fn cmd_download(
    config: &Config,
    tmdb_id: i32,
    season_number: i32,
    episode_number: i32,
) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;

    let session =
        super::episodes::open_session(&state, tmdb_id, season_number, None, None).await?;

    let episodes = match session.episodes() {
        Resource::Success(list) => list,
        Resource::Error(message) => {
            println!("⚠ {message}");
            return Ok(());
        }
        Resource::Loading => return Ok(()),
    };

    let Some(episode) = episodes
        .into_iter()
        .find(|e| e.episode_number == episode_number)
    else {
        println!("Episode {episode_number} not found in season {season_number}.");
        return Ok(());
    };

    if episode.offline {
        println!("Already downloaded: {}", episode.file_id.unwrap_or_default());
        return Ok(());
    }

    let request = session.request();
    let download = DownloadRequest {
        tmdb_id,
        show_name: request.show_name.clone(),
        show_poster: request.show_poster.clone(),
        season_number,
        episode_number,
        title: format!("{} {}", request.show_name, episode.key()),
        file_id: episode.file_id,
        extension: None,
    };

    let mut events = state.event_bus.subscribe();
    let (queue, rx) = DownloadQueue::new(DOWNLOAD_QUEUE_CAPACITY, state.event_bus.clone());
    let worker = state.download_worker().spawn(rx);

    if !queue.enqueue(download) {
        println!("No file on Drive for S{season_number:02}E{episode_number:02}.");
        return Ok(());
    }
    drop(queue);

    println!("Downloading...");
    worker.await?;

    while let Ok(event) = events.try_recv() {
        match event {
            NotificationEvent::DownloadFinished { title, path } => {
                println!("✓ {title} saved to {path}");
            }
            NotificationEvent::DownloadFailed { title, message } => {
                println!("✗ {title}: {message}");
            }
            _ => {}
        }
    }

    Ok(())
}
