use crate::models::episode::Episode;
use crate::models::watched::WatchedEpisode;

/// Picks the reconciled episode to resume from.
///
/// Yields the episode matching the most recently watched row, but only when it
/// still has a playable source.
#[must_use]
pub fn resolve_last_watched(
    episodes: &[Episode],
    last: Option<&WatchedEpisode>,
) -> Option<Episode> {
    let last = last?;
    episodes
        .iter()
        .find(|e| e.episode_number == last.episode_number)
        .filter(|e| e.is_playable())
        .cloned()
}
