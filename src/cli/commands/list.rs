use crate::config::Config;

pub async fn cmd_list_shows(config: &Config) -> anyhow::Result<()> {
    let store = super::open_store(config).await?;
    let saved = store.list_saved_shows().await?;
    let offline = store.list_offline_shows().await?;

    if saved.is_empty() && offline.is_empty() {
        println!("No shows saved.");
        println!();
        println!("Add one with: zplex add-show <tmdb_id> \"name\" --folder-id <drive folder>");
        return Ok(());
    }

    println!("Saved Shows ({} total)", saved.len());
    println!("{:-<70}", "");
    for show in &saved {
        let folder = show.file_id.as_deref().unwrap_or("-");
        println!("• {} (TMDB {}) | Drive folder: {}", show.name, show.tmdb_id, folder);
    }

    if !offline.is_empty() {
        println!();
        println!("Downloaded ({} shows)", offline.len());
        println!("{:-<70}", "");
        for show in &offline {
            let seasons = store.get_offline_seasons(show.tmdb_id).await?;
            let numbers: Vec<String> = seasons
                .iter()
                .map(|s| s.season_number.to_string())
                .collect();
            println!(
                "⬇ {} (TMDB {}) | Seasons: {}",
                show.name,
                show.tmdb_id,
                numbers.join(", ")
            );
        }
    }

    Ok(())
}
