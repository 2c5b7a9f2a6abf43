mod add;
mod download;
mod episodes;
mod list;
mod progress;
mod remove;

pub use add::cmd_add_show;
pub use download::cmd_download;
pub use episodes::cmd_season;
pub use list::cmd_list_shows;
pub use progress::cmd_progress;
pub use remove::cmd_remove_offline;

use crate::config::Config;
use crate::db::Store;
use std::time::Duration;

async fn open_store(config: &Config) -> anyhow::Result<Store> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    Ok(store.with_watch_poll_interval(Duration::from_millis(
        config.general.watch_poll_interval_ms,
    )))
}
