//! Episode-to-file reconciliation.
//!
//! Each TMDB episode is resolved against two indexes keyed by `SxxEyy`: the
//! offline overlay (downloaded files) and the file index built from the season
//! folder listing. Resolution order is fixed: offline, then remote, then none.

use crate::models::drive::DriveFile;
use crate::models::episode::Episode;
use crate::models::offline::OfflineEpisode;
use crate::parser::{episode_key, extract_episode_key};
use crate::services::ports::LibraryStore;
use anyhow::Result;
use std::collections::HashMap;
use tracing::{debug, info};

/// Episode key to the Drive entry that carries it.
pub type FileIndex = HashMap<String, DriveFile>;

/// Episode key to the local path of a downloaded file.
pub type OfflineOverlay = HashMap<String, String>;

/// Builds the key→file index for one season folder.
///
/// Files whose names carry no `SxxEyy` token are skipped. When two files yield
/// the same key the later one in listing order wins. Keys are upper-cased so a
/// lowercase `s01e02` joins the canonical `S01E02`.
#[must_use]
pub fn build_file_index(files: &[DriveFile]) -> FileIndex {
    let mut index = FileIndex::with_capacity(files.len());

    for file in files {
        let Some(key) = extract_episode_key(&file.name) else {
            debug!("No episode pattern in {:?}", file.name);
            continue;
        };

        if let Some(previous) = index.insert(key.to_ascii_uppercase(), file.clone()) {
            debug!(
                "Duplicate episode key {} ({:?} replaces {:?})",
                key, file.name, previous.name
            );
        }
    }

    index
}

/// Builds the key→path overlay from offline episode records.
#[must_use]
pub fn build_offline_overlay(records: &[OfflineEpisode]) -> OfflineOverlay {
    records
        .iter()
        .map(|r| {
            (
                episode_key(r.season_number, r.episode_number),
                r.file_path.clone(),
            )
        })
        .collect()
}

/// Loads the offline overlay for one season from the library store.
pub async fn resolve_offline_overlay(
    store: &dyn LibraryStore,
    tmdb_id: i32,
    season_number: i32,
) -> Result<OfflineOverlay> {
    let records = store.offline_episodes(tmdb_id, season_number).await?;
    Ok(build_offline_overlay(&records))
}

/// Where an episode's playable file comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpisodeSource {
    Offline { path: String },
    RemoteMatched { file_id: String, size: Option<String> },
    Unmatched,
}

impl EpisodeSource {
    /// Resolves one key. A `None` file index means no season folder was
    /// found, so only the offline overlay is consulted.
    #[must_use]
    pub fn resolve(key: &str, overlay: &OfflineOverlay, index: Option<&FileIndex>) -> Self {
        if let Some(path) = overlay.get(key) {
            return Self::Offline { path: path.clone() };
        }

        match index.and_then(|idx| idx.get(key)) {
            Some(file) => Self::RemoteMatched {
                file_id: file.id.clone(),
                size: file.human_size(),
            },
            None => Self::Unmatched,
        }
    }

    /// Returns a copy of `episode` annotated with this source.
    #[must_use]
    pub fn apply(self, episode: &Episode) -> Episode {
        let mut annotated = episode.clone();
        match self {
            Self::Offline { path } => {
                annotated.file_id = Some(path);
                annotated.offline = true;
            }
            Self::RemoteMatched { file_id, size } => {
                annotated.file_id = Some(file_id);
                annotated.file_size = size;
            }
            Self::Unmatched => {
                annotated.file_id = None;
            }
        }
        annotated
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub matched: usize,
    pub offline: usize,
    pub total: usize,
}

impl ReconcileStats {
    fn record(metrics_labels: &'static str, stats: &Self) {
        metrics::counter!("zplex_episodes_reconciled_total", "mode" => metrics_labels)
            .increment(stats.total as u64);
        metrics::counter!("zplex_episodes_matched_total").increment(stats.matched as u64);
        metrics::counter!("zplex_episodes_offline_total").increment(stats.offline as u64);
    }
}

/// Annotates every episode with its resolved source, in input order.
///
/// Pure over its inputs: the same episodes, overlay and index always produce
/// the same output.
#[must_use]
pub fn reconcile_episodes(
    episodes: &[Episode],
    overlay: &OfflineOverlay,
    index: Option<&FileIndex>,
) -> (Vec<Episode>, ReconcileStats) {
    let mut stats = ReconcileStats {
        total: episodes.len(),
        ..ReconcileStats::default()
    };

    if index.is_none() {
        debug!("Mapping attempt failed, using default");
    }

    let annotated = episodes
        .iter()
        .map(|episode| {
            let key = episode.key();
            let source = EpisodeSource::resolve(&key, overlay, index);

            match &source {
                EpisodeSource::Offline { .. } => {
                    debug!("Found offline file for episode {}", key);
                    stats.offline += 1;
                }
                EpisodeSource::RemoteMatched { .. } => {
                    debug!("Found matching file for episode {}", key);
                    stats.matched += 1;
                }
                EpisodeSource::Unmatched => {
                    debug!("No matching file found for episode {}", key);
                }
            }

            source.apply(episode)
        })
        .collect();

    if index.is_some() {
        info!(
            "Matched {} out of {} episodes and {} were offline",
            stats.matched, stats.total, stats.offline
        );
    }
    ReconcileStats::record(if index.is_some() { "folder" } else { "default" }, &stats);

    (annotated, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline(season: i32, episode: i32, path: &str) -> OfflineEpisode {
        OfflineEpisode {
            tmdb_id: 1,
            season_number: season,
            episode_number: episode,
            file_path: path.to_string(),
        }
    }

    fn pilot_and_next() -> Vec<Episode> {
        vec![Episode::new(1, 1, "Pilot"), Episode::new(1, 2, "Next")]
    }

    #[test]
    fn test_file_index_skips_unmatched_names() {
        let files = vec![
            DriveFile::new("a", "Show - S01E01.mkv"),
            DriveFile::new("b", "Show - Extras.mkv"),
            DriveFile::new("c", "show.s01e02.mkv"),
        ];

        let index = build_file_index(&files);
        assert_eq!(index.len(), 2);
        assert_eq!(index["S01E01"].id, "a");
        assert_eq!(index["S01E02"].id, "c");
    }

    #[test]
    fn test_file_index_last_duplicate_wins() {
        let files = vec![
            DriveFile::new("first", "Show - S01E03 [720p].mkv"),
            DriveFile::new("second", "Show - S01E03 [1080p].mkv"),
        ];

        let index = build_file_index(&files);
        assert_eq!(index.len(), 1);
        assert_eq!(index["S01E03"].id, "second");
    }

    #[test]
    fn test_case_variants_share_a_key() {
        // Keys are folded to upper case, so a later lower-case name replaces
        // the earlier upper-case one.
        let files = vec![
            DriveFile::new("episode", "S01E02.mkv"),
            DriveFile::new("sample", "s01e02.sample.mkv"),
        ];

        let index = build_file_index(&files);
        assert_eq!(index.len(), 1);
        assert_eq!(index["S01E02"].id, "sample");
        assert!(!index.contains_key("s01e02"));
    }

    #[test]
    fn test_offline_overlay_keys() {
        let overlay = build_offline_overlay(&[offline(2, 5, "/o/a.mkv"), offline(2, 105, "/o/b.mkv")]);
        assert_eq!(overlay["S02E05"], "/o/a.mkv");
        assert_eq!(overlay["S02E105"], "/o/b.mkv");
    }

    #[test]
    fn test_mixed_offline_and_remote() {
        let files = vec![DriveFile::new("remote-2", "Show - S01E02.mkv").with_size(1_610_612_736)];
        let index = build_file_index(&files);
        let overlay = build_offline_overlay(&[offline(1, 1, "/local/e1.mkv")]);

        let (episodes, stats) = reconcile_episodes(&pilot_and_next(), &overlay, Some(&index));

        assert_eq!(episodes[0].file_id.as_deref(), Some("/local/e1.mkv"));
        assert!(episodes[0].offline);
        assert_eq!(episodes[0].file_size, None);

        assert_eq!(episodes[1].file_id.as_deref(), Some("remote-2"));
        assert!(!episodes[1].offline);
        assert_eq!(episodes[1].file_size.as_deref(), Some("1.50 GiB"));

        assert_eq!(
            stats,
            ReconcileStats {
                matched: 1,
                offline: 1,
                total: 2
            }
        );
    }

    #[test]
    fn test_offline_dominates_remote() {
        let files = vec![
            DriveFile::new("remote-1", "Show - S01E01.mkv"),
            DriveFile::new("remote-2", "Show - S01E02.mkv"),
        ];
        let index = build_file_index(&files);
        let overlay = build_offline_overlay(&[offline(1, 1, "/local/e1.mkv"), offline(1, 2, "/local/e2.mkv")]);

        let (episodes, stats) = reconcile_episodes(&pilot_and_next(), &overlay, Some(&index));

        assert!(episodes.iter().all(|e| e.offline));
        assert_eq!(episodes[1].file_id.as_deref(), Some("/local/e2.mkv"));
        assert_eq!(stats.matched, 0);
        assert_eq!(stats.offline, 2);
    }

    #[test]
    fn test_default_mapping_ignores_remote() {
        let overlay = build_offline_overlay(&[offline(1, 2, "/local/e2.mkv")]);

        let (episodes, stats) = reconcile_episodes(&pilot_and_next(), &overlay, None);

        assert_eq!(episodes[0].file_id, None);
        assert!(!episodes[0].offline);
        assert_eq!(episodes[1].file_id.as_deref(), Some("/local/e2.mkv"));
        assert_eq!(stats.matched, 0);
        assert_eq!(stats.offline, 1);
    }

    #[test]
    fn test_unmatched_clears_stale_file_id() {
        let mut stale = Episode::new(1, 1, "Pilot");
        stale.file_id = Some("old".to_string());

        let (episodes, _) = reconcile_episodes(&[stale], &OfflineOverlay::new(), Some(&FileIndex::new()));
        assert_eq!(episodes[0].file_id, None);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let files = vec![DriveFile::new("remote-2", "Show - S01E02.mkv")];
        let index = build_file_index(&files);
        let overlay = build_offline_overlay(&[offline(1, 1, "/local/e1.mkv")]);
        let input = pilot_and_next();

        let first = reconcile_episodes(&input, &overlay, Some(&index));
        let second = reconcile_episodes(&input, &overlay, Some(&index));
        assert_eq!(first, second);
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let input = pilot_and_next();
        let overlay = build_offline_overlay(&[offline(1, 1, "/local/e1.mkv")]);

        let _ = reconcile_episodes(&input, &overlay, None);
        assert!(input.iter().all(|e| e.file_id.is_none() && !e.offline));
    }
}
