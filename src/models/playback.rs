use serde::Serialize;

/// One entry of the playlist handed to the external player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaybackItem {
    pub tmdb_id: i32,
    pub title: String,
    pub poster_path: Option<String>,
    pub file_id: String,
    pub offline: bool,
    pub season_number: i32,
    pub episode_number: i32,
    pub episode_title: Option<String>,
}
