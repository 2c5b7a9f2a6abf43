use crate::constants::playback::MAX_PROGRESS;
use serde::{Deserialize, Serialize};

/// Persisted playback state for one episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchedEpisode {
    pub tmdb_id: i32,
    pub season_number: i32,
    pub episode_number: i32,
    /// Playback position in milliseconds.
    pub watched_duration: i64,
    /// Total runtime in milliseconds.
    pub total_duration: i64,
    pub updated_at: String,
}

impl WatchedEpisode {
    /// Position relative to runtime as a whole percentage in `0..=100`.
    #[must_use]
    pub fn watch_progress(&self) -> i32 {
        if self.total_duration <= 0 {
            return 0;
        }

        let percent = self.watched_duration.max(0).saturating_mul(100) / self.total_duration;
        i32::try_from(percent).map_or(MAX_PROGRESS, |p| p.min(MAX_PROGRESS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn watched(position: i64, total: i64) -> WatchedEpisode {
        WatchedEpisode {
            tmdb_id: 1,
            season_number: 1,
            episode_number: 2,
            watched_duration: position,
            total_duration: total,
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_watch_progress() {
        assert_eq!(watched(1_500_000, 3_000_000).watch_progress(), 50);
        assert_eq!(watched(2_999_999, 3_000_000).watch_progress(), 99);
        assert_eq!(watched(0, 3_000_000).watch_progress(), 0);
    }

    #[test]
    fn test_watch_progress_bounds() {
        assert_eq!(watched(10, 0).watch_progress(), 0);
        assert_eq!(watched(-5, 100).watch_progress(), 0);
        assert_eq!(watched(500, 100).watch_progress(), 100);
    }
}
