use crate::config::Config;
use crate::models::show::SavedShow;

pub async fn cmd_add_show(
    config: &Config,
    tmdb_id: i32,
    name: &str,
    folder_id: Option<String>,
    poster: Option<String>,
) -> anyhow::Result<()> {
    let store = super::open_store(config).await?;

    let show = SavedShow {
        tmdb_id,
        name: name.to_string(),
        poster_path: poster,
        file_id: folder_id,
    };
    store.save_show(&show).await?;

    println!("✓ Saved: {} (TMDB {})", show.name, show.tmdb_id);
    match &show.file_id {
        Some(folder) => println!("  Drive folder: {folder}"),
        None => println!("  No Drive folder set, seasons will only show offline files"),
    }

    Ok(())
}
