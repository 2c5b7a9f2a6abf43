use crate::parser::episode_key;
use serde::{Deserialize, Serialize};

/// One TMDB episode, annotated with its playable source and watch progress.
///
/// The annotation fields default to "unresolved" so a raw TMDB payload and a
/// cached season snapshot deserialize into the same type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    #[serde(default)]
    pub id: Option<i64>,
    pub season_number: i32,
    pub episode_number: i32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub still_path: Option<String>,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,

    /// Local path for offline episodes, Drive file id for remote ones.
    #[serde(default)]
    pub file_id: Option<String>,
    #[serde(default)]
    pub file_size: Option<String>,
    #[serde(default)]
    pub offline: bool,
    #[serde(default)]
    pub progress: i32,
}

impl Episode {
    #[must_use]
    pub fn new(season_number: i32, episode_number: i32, name: impl Into<String>) -> Self {
        Self {
            id: None,
            season_number,
            episode_number,
            name: Some(name.into()),
            overview: None,
            still_path: None,
            air_date: None,
            vote_average: None,
            file_id: None,
            file_size: None,
            offline: false,
            progress: 0,
        }
    }

    /// `SxxEyy` join key used against filenames and offline records.
    #[must_use]
    pub fn key(&self) -> String {
        episode_key(self.season_number, self.episode_number)
    }

    #[must_use]
    pub const fn is_playable(&self) -> bool {
        self.file_id.is_some()
    }

    /// Display title, falling back to `Episode {n}` when TMDB has none.
    #[must_use]
    pub fn title(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => format!("Episode {}", self.episode_number),
        }
    }
}
