//! Collaborator implementations backed by [`Store`], including the
//! push-updated watch-state feeds.

use super::{Store, WatchedChange};
use crate::models::offline::{OfflineEpisode, OfflineSeason, OfflineShow};
use crate::models::show::SavedShow;
use crate::models::watched::WatchedEpisode;
use crate::services::ports::{LibraryStore, WatchStore};
use anyhow::Result;
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tracing::warn;

/// Waits for the next change touching the given season.
///
/// Returns `false` once the bus is closed. A lagged receiver counts as a change
/// since whatever it missed may have touched the season.
async fn next_change(
    rx: &mut broadcast::Receiver<WatchedChange>,
    tmdb_id: i32,
    season_number: i32,
) -> bool {
    loop {
        match rx.recv().await {
            Ok(change) if change.is_for(tmdb_id, season_number) => return true,
            Ok(_) => {}
            Err(RecvError::Lagged(_)) => return true,
            Err(RecvError::Closed) => return false,
        }
    }
}

enum Wake {
    /// A write went through this store handle.
    Notified,
    /// Poll tick. Picks up writes made by other handles and processes.
    Poll,
    Closed,
}

struct FeedState<T, F> {
    store: Store,
    rx: broadcast::Receiver<WatchedChange>,
    poll: Interval,
    last: Option<T>,
    first: bool,
    query: F,
}

/// Emits `query` once up front and again whenever the season's rows change.
///
/// Writes through this store are pushed over the change bus. Writes through
/// any other handle on the same database are caught by polling every
/// `poll_every`; a poll only emits when the result differs from the last one.
fn season_feed<T, F, Fut>(
    store: &Store,
    tmdb_id: i32,
    season_number: i32,
    poll_every: Duration,
    query: F,
) -> BoxStream<'static, T>
where
    T: Clone + PartialEq + Send + 'static,
    F: Fn(Store) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<T>> + Send + 'static,
{
    let mut poll = interval_at(Instant::now() + poll_every, poll_every);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let state = FeedState {
        store: store.clone(),
        rx: store.subscribe_watched(),
        poll,
        last: None,
        first: true,
        query,
    };

    stream::unfold(state, move |mut state| async move {
        loop {
            let forced = if state.first {
                state.first = false;
                true
            } else {
                let wake = tokio::select! {
                    changed = next_change(&mut state.rx, tmdb_id, season_number) => {
                        if changed { Wake::Notified } else { Wake::Closed }
                    }
                    _ = state.poll.tick() => Wake::Poll,
                };
                match wake {
                    Wake::Notified => true,
                    Wake::Poll => false,
                    Wake::Closed => return None,
                }
            };

            match (state.query)(state.store.clone()).await {
                Ok(value) if forced || state.last.as_ref() != Some(&value) => {
                    state.last = Some(value.clone());
                    return Some((value, state));
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(tmdb_id, season_number, error = %e, "Failed to refresh watch feed");
                }
            }
        }
    })
    .boxed()
}

#[async_trait::async_trait]
impl LibraryStore for Store {
    async fn saved_show(&self, tmdb_id: i32) -> Result<Option<SavedShow>> {
        self.get_saved_show(tmdb_id).await
    }

    async fn offline_episodes(
        &self,
        tmdb_id: i32,
        season_number: i32,
    ) -> Result<Vec<OfflineEpisode>> {
        self.get_offline_episodes(tmdb_id, season_number).await
    }

    async fn upsert_offline_episode(&self, episode: &OfflineEpisode) -> Result<()> {
        self.add_offline_episode(episode).await
    }

    async fn delete_offline_episode(
        &self,
        tmdb_id: i32,
        season_number: i32,
        episode_number: i32,
    ) -> Result<bool> {
        self.remove_offline_episode(tmdb_id, season_number, episode_number)
            .await
    }

    async fn offline_season(
        &self,
        tmdb_id: i32,
        season_number: i32,
    ) -> Result<Option<OfflineSeason>> {
        self.get_offline_season(tmdb_id, season_number).await
    }

    async fn offline_seasons(&self, tmdb_id: i32) -> Result<Vec<OfflineSeason>> {
        self.get_offline_seasons(tmdb_id).await
    }

    async fn upsert_offline_season(&self, season: &OfflineSeason) -> Result<()> {
        self.add_offline_season(season).await
    }

    async fn delete_offline_season(&self, tmdb_id: i32, season_number: i32) -> Result<bool> {
        self.remove_offline_season(tmdb_id, season_number).await
    }

    async fn upsert_offline_show(&self, show: &OfflineShow) -> Result<()> {
        self.add_offline_show(show).await
    }

    async fn delete_offline_show(&self, tmdb_id: i32) -> Result<bool> {
        self.remove_offline_show(tmdb_id).await
    }
}

#[async_trait::async_trait]
impl WatchStore for Store {
    async fn watched_season(
        &self,
        tmdb_id: i32,
        season_number: i32,
    ) -> Result<Vec<WatchedEpisode>> {
        self.get_watched_season(tmdb_id, season_number).await
    }

    fn watched_season_live(
        &self,
        tmdb_id: i32,
        season_number: i32,
    ) -> BoxStream<'static, Vec<WatchedEpisode>> {
        let poll_every = self.watch_poll_interval();
        season_feed(self, tmdb_id, season_number, poll_every, move |store| async move {
            store.get_watched_season(tmdb_id, season_number).await
        })
    }

    async fn last_watched_episode(
        &self,
        tmdb_id: i32,
        season_number: i32,
    ) -> Result<Option<WatchedEpisode>> {
        self.get_last_watched(tmdb_id, season_number).await
    }

    fn last_watched_live(
        &self,
        tmdb_id: i32,
        season_number: i32,
    ) -> BoxStream<'static, Option<WatchedEpisode>> {
        let poll_every = self.watch_poll_interval();
        season_feed(self, tmdb_id, season_number, poll_every, move |store| async move {
            store.get_last_watched(tmdb_id, season_number).await
        })
    }

    async fn upsert_progress(&self, watched: &WatchedEpisode) -> Result<()> {
        self.record_watched(watched).await
    }
}
