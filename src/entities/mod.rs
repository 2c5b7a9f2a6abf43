pub mod prelude;

pub mod offline_episodes;
pub mod offline_seasons;
pub mod offline_shows;
pub mod saved_shows;
pub mod watched_episodes;
