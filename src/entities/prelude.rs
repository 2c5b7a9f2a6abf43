pub use super::offline_episodes::Entity as OfflineEpisodes;
pub use super::offline_seasons::Entity as OfflineSeasons;
pub use super::offline_shows::Entity as OfflineShows;
pub use super::saved_shows::Entity as SavedShows;
pub use super::watched_episodes::Entity as WatchedEpisodes;
