use crate::entities::{prelude::*, watched_episodes};
use crate::models::watched::WatchedEpisode;
use anyhow::Result;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

/// Repository for per-episode playback progress
pub struct WatchedRepository {
    conn: DatabaseConnection,
}

impl WatchedRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(m: watched_episodes::Model) -> WatchedEpisode {
        WatchedEpisode {
            tmdb_id: m.tmdb_id,
            season_number: m.season_number,
            episode_number: m.episode_number,
            watched_duration: m.watched_duration,
            total_duration: m.total_duration,
            updated_at: m.updated_at,
        }
    }

    pub async fn season(&self, tmdb_id: i32, season_number: i32) -> Result<Vec<WatchedEpisode>> {
        let rows = WatchedEpisodes::find()
            .filter(watched_episodes::Column::TmdbId.eq(tmdb_id))
            .filter(watched_episodes::Column::SeasonNumber.eq(season_number))
            .order_by_asc(watched_episodes::Column::EpisodeNumber)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    /// Most recently updated episode of the season.
    pub async fn last_watched(
        &self,
        tmdb_id: i32,
        season_number: i32,
    ) -> Result<Option<WatchedEpisode>> {
        let row = WatchedEpisodes::find()
            .filter(watched_episodes::Column::TmdbId.eq(tmdb_id))
            .filter(watched_episodes::Column::SeasonNumber.eq(season_number))
            .order_by_desc(watched_episodes::Column::UpdatedAt)
            .order_by_desc(watched_episodes::Column::EpisodeNumber)
            .one(&self.conn)
            .await?;

        Ok(row.map(Self::map_model))
    }

    pub async fn upsert(&self, watched: &WatchedEpisode) -> Result<()> {
        let active_model = watched_episodes::ActiveModel {
            tmdb_id: Set(watched.tmdb_id),
            season_number: Set(watched.season_number),
            episode_number: Set(watched.episode_number),
            watched_duration: Set(watched.watched_duration),
            total_duration: Set(watched.total_duration),
            updated_at: Set(watched.updated_at.clone()),
        };

        WatchedEpisodes::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    watched_episodes::Column::TmdbId,
                    watched_episodes::Column::SeasonNumber,
                    watched_episodes::Column::EpisodeNumber,
                ])
                .update_columns([
                    watched_episodes::Column::WatchedDuration,
                    watched_episodes::Column::TotalDuration,
                    watched_episodes::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(())
    }
}
