//! Merges persisted watch state into a reconciled season and derives the
//! playback queue.

use crate::domain::{QueuePolicy, Resource};
use crate::models::episode::Episode;
use crate::models::playback::PlaybackItem;
use crate::models::watched::WatchedEpisode;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Show-level fields copied into every playback item.
#[derive(Debug, Clone)]
pub struct PlaybackContext {
    pub tmdb_id: i32,
    pub title: String,
    pub poster_path: Option<String>,
    pub offline_root: PathBuf,
}

impl PlaybackContext {
    fn is_offline_path(&self, file_id: &str) -> bool {
        Path::new(file_id).starts_with(&self.offline_root)
    }

    fn item_for(&self, episode: &Episode, file_id: &str) -> PlaybackItem {
        PlaybackItem {
            tmdb_id: self.tmdb_id,
            title: self.title.clone(),
            poster_path: self.poster_path.clone(),
            file_id: file_id.to_string(),
            offline: self.is_offline_path(file_id),
            season_number: episode.season_number,
            episode_number: episode.episode_number,
            episode_title: episode.name.clone(),
        }
    }
}

/// Annotates episode progress from `watched` and collects playable episodes.
///
/// Returns the annotated resource and the playback-queue addendum in episode
/// order. Loading and error resources pass through with an empty addendum.
#[must_use]
pub fn merge_watched(
    episodes: &Resource<Vec<Episode>>,
    watched: &[WatchedEpisode],
    context: &PlaybackContext,
) -> (Resource<Vec<Episode>>, Vec<PlaybackItem>) {
    let Resource::Success(list) = episodes else {
        return (episodes.clone(), Vec::new());
    };

    let progress: HashMap<i32, i32> = watched
        .iter()
        .map(|w| (w.episode_number, w.watch_progress()))
        .collect();

    let mut addendum = Vec::new();
    let merged = list
        .iter()
        .map(|episode| {
            let mut merged = episode.clone();
            if let Some(&p) = progress.get(&episode.episode_number) {
                merged.progress = p;
            }
            if let Some(file_id) = merged.file_id.as_deref() {
                addendum.push(context.item_for(&merged, file_id));
            }
            merged
        })
        .collect();

    (Resource::Success(merged), addendum)
}

/// Playback queue owned by one season session.
///
/// Under [`QueuePolicy::Accumulate`] every merge appends its addendum, so a
/// season whose watch feed updates twice holds each playable episode twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackQueue {
    items: Vec<PlaybackItem>,
}

impl PlaybackQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, addendum: Vec<PlaybackItem>, policy: QueuePolicy) {
        if !policy.is_accumulate() {
            self.items.clear();
        }
        self.items.extend(addendum);
    }

    pub fn reset(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn items(&self) -> &[PlaybackItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> PlaybackContext {
        PlaybackContext {
            tmdb_id: 1399,
            title: "Game of Thrones".to_string(),
            poster_path: Some("/poster.jpg".to_string()),
            offline_root: PathBuf::from("/data/offline"),
        }
    }

    fn reconciled() -> Resource<Vec<Episode>> {
        let mut e1 = Episode::new(1, 1, "Pilot");
        e1.file_id = Some("/data/offline/1399/1/abc.mkv".to_string());
        e1.offline = true;
        let mut e2 = Episode::new(1, 2, "Next");
        e2.file_id = Some("drive-file-2".to_string());
        let e3 = Episode::new(1, 3, "Unmatched");
        Resource::Success(vec![e1, e2, e3])
    }

    fn watched(episode: i32, position: i64, total: i64) -> WatchedEpisode {
        WatchedEpisode {
            tmdb_id: 1399,
            season_number: 1,
            episode_number: episode,
            watched_duration: position,
            total_duration: total,
            updated_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_only_watched_episode_gets_progress() {
        let (merged, _) = merge_watched(&reconciled(), &[watched(2, 600_000, 1_200_000)], &context());

        let episodes = merged.data().unwrap();
        let progress: Vec<i32> = episodes.iter().map(|e| e.progress).collect();
        assert_eq!(progress, vec![0, 50, 0]);
    }

    #[test]
    fn test_addendum_contains_playable_episodes() {
        let (_, addendum) = merge_watched(&reconciled(), &[], &context());

        assert_eq!(addendum.len(), 2);
        assert!(addendum[0].offline);
        assert_eq!(addendum[0].episode_number, 1);
        assert!(!addendum[1].offline);
        assert_eq!(addendum[1].file_id, "drive-file-2");
        assert_eq!(addendum[1].title, "Game of Thrones");
        assert_eq!(addendum[1].episode_title.as_deref(), Some("Next"));
    }

    #[test]
    fn test_non_success_passes_through() {
        let error: Resource<Vec<Episode>> = Resource::Error("No internet connection".to_string());
        let (merged, addendum) = merge_watched(&error, &[watched(1, 1, 2)], &context());
        assert_eq!(merged, error);
        assert!(addendum.is_empty());

        let (merged, addendum) = merge_watched(&Resource::Loading, &[], &context());
        assert_eq!(merged, Resource::Loading);
        assert!(addendum.is_empty());
    }

    #[test]
    fn test_accumulating_queue_doubles() {
        let mut queue = PlaybackQueue::new();

        let (_, addendum) = merge_watched(&reconciled(), &[], &context());
        queue.extend(addendum, QueuePolicy::Accumulate);
        assert_eq!(queue.len(), 2);

        let (_, addendum) = merge_watched(&reconciled(), &[], &context());
        queue.extend(addendum, QueuePolicy::Accumulate);
        assert_eq!(queue.len(), 4);

        queue.reset();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_replacing_queue_keeps_latest() {
        let mut queue = PlaybackQueue::new();

        for _ in 0..3 {
            let (_, addendum) = merge_watched(&reconciled(), &[], &context());
            queue.extend(addendum, QueuePolicy::Replace);
        }
        assert_eq!(queue.len(), 2);
    }
}
