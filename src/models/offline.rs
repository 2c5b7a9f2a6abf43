use serde::{Deserialize, Serialize};

/// A downloaded episode file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfflineEpisode {
    pub tmdb_id: i32,
    pub season_number: i32,
    pub episode_number: i32,
    pub file_path: String,
}

/// Season grouping for offline episodes, holding the TMDB payload snapshot
/// used when the season is opened without connectivity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfflineSeason {
    pub tmdb_id: i32,
    pub season_number: i32,
    pub json: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfflineShow {
    pub tmdb_id: i32,
    pub name: String,
    pub poster_path: Option<String>,
}
