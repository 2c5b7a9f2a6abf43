use crate::cli::SeasonArgs;
use crate::config::Config;
use crate::domain::Resource;
use crate::models::episode::Episode;
use crate::services::{SeasonRequest, SeasonSession};
use crate::state::SharedState;

/// Opens a season session, filling the show name and poster from the saved
/// show when not given.
pub(super) async fn open_session(
    state: &SharedState,
    tmdb_id: i32,
    season_number: i32,
    show_name: Option<String>,
    poster: Option<String>,
) -> anyhow::Result<SeasonSession> {
    let saved = state.store.get_saved_show(tmdb_id).await?;

    let show_name = show_name
        .or_else(|| saved.as_ref().map(|s| s.name.clone()))
        .unwrap_or_else(|| format!("Show {tmdb_id}"));
    let show_poster = poster.or_else(|| saved.and_then(|s| s.poster_path));

    let request = SeasonRequest {
        tmdb_id,
        show_name,
        show_poster,
        season_number,
    };

    Ok(SeasonSession::open(state.season_deps(), request).await)
}

pub async fn cmd_season(config: &Config, args: SeasonArgs) -> anyhow::Result<()> {
    let state = if args.offline {
        SharedState::offline(config.clone()).await?
    } else {
        SharedState::new(config.clone()).await?
    };

    let mut session = open_session(
        &state,
        args.tmdb_id,
        args.season,
        args.show_name.clone(),
        args.poster.clone(),
    )
    .await?;

    match session.header() {
        Resource::Success(header) => {
            println!("{}", header.season_name.as_deref().unwrap_or(&header.season_number));
            println!("{:-<70}", "");
            println!("{}", header.season_overview);
            println!();
        }
        Resource::Error(message) => {
            println!("⚠ {message}");
            return Ok(());
        }
        Resource::Loading => {}
    }

    if !args.watch {
        session.refresh().await?;
        print_episodes(&session.episodes());
        print_resume(session.last_watched().as_ref());
        println!("Playback queue: {} episodes", session.queue().len());
        return Ok(());
    }

    let mut updates = session.subscribe_episodes();
    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let episodes = updates.borrow_and_update().clone();
            print_episodes(&episodes);
        }
    });

    println!("Following watch progress, press Ctrl-C to stop");
    session
        .run(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;

    print_resume(session.last_watched().as_ref());
    drop(session);
    let _ = printer.await;
    Ok(())
}

fn print_episodes(episodes: &Resource<Vec<Episode>>) {
    let list = match episodes {
        Resource::Success(list) => list,
        Resource::Error(message) => {
            println!("⚠ {message}");
            return;
        }
        Resource::Loading => return,
    };

    if list.is_empty() {
        println!("No episodes.");
        return;
    }

    for episode in list {
        let icon = match (&episode.file_id, episode.offline) {
            (Some(_), true) => "⬇",
            (Some(_), false) => "▶",
            (None, _) => "○",
        };
        let size = episode
            .file_size
            .as_deref()
            .map(|s| format!(" [{s}]"))
            .unwrap_or_default();
        let progress = if episode.progress > 0 {
            format!(" ({}%)", episode.progress)
        } else {
            String::new()
        };

        println!(
            "{} {} {}{}{}",
            icon,
            episode.key(),
            episode.title(),
            size,
            progress
        );
    }

    println!();
    println!("Legend: ⬇ Offline | ▶ On Drive | ○ No file");
}

fn print_resume(last: Option<&Episode>) {
    if let Some(episode) = last {
        println!("Resume: {} {}", episode.key(), episode.title());
    }
}
