use crate::entities::{offline_episodes, offline_seasons, offline_shows, prelude::*};
use crate::models::offline::{OfflineEpisode, OfflineSeason, OfflineShow};
use anyhow::Result;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

/// Repository for downloaded shows, seasons and episodes
pub struct OfflineRepository {
    conn: DatabaseConnection,
}

impl OfflineRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    // ========================================================================
    // Model Conversion Helpers
    // ========================================================================

    fn map_episode(m: offline_episodes::Model) -> OfflineEpisode {
        OfflineEpisode {
            tmdb_id: m.tmdb_id,
            season_number: m.season_number,
            episode_number: m.episode_number,
            file_path: m.file_path,
        }
    }

    fn map_season(m: offline_seasons::Model) -> OfflineSeason {
        OfflineSeason {
            tmdb_id: m.tmdb_id,
            season_number: m.season_number,
            json: m.json,
        }
    }

    fn map_show(m: offline_shows::Model) -> OfflineShow {
        OfflineShow {
            tmdb_id: m.tmdb_id,
            name: m.name,
            poster_path: m.poster_path,
        }
    }

    // ========================================================================
    // Episodes
    // ========================================================================

    pub async fn episodes(&self, tmdb_id: i32, season_number: i32) -> Result<Vec<OfflineEpisode>> {
        let rows = OfflineEpisodes::find()
            .filter(offline_episodes::Column::TmdbId.eq(tmdb_id))
            .filter(offline_episodes::Column::SeasonNumber.eq(season_number))
            .order_by_asc(offline_episodes::Column::EpisodeNumber)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_episode).collect())
    }

    pub async fn upsert_episode(&self, episode: &OfflineEpisode) -> Result<()> {
        let active_model = offline_episodes::ActiveModel {
            tmdb_id: Set(episode.tmdb_id),
            season_number: Set(episode.season_number),
            episode_number: Set(episode.episode_number),
            file_path: Set(episode.file_path.clone()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        OfflineEpisodes::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    offline_episodes::Column::TmdbId,
                    offline_episodes::Column::SeasonNumber,
                    offline_episodes::Column::EpisodeNumber,
                ])
                .update_column(offline_episodes::Column::FilePath)
                .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn delete_episode(
        &self,
        tmdb_id: i32,
        season_number: i32,
        episode_number: i32,
    ) -> Result<bool> {
        let result = OfflineEpisodes::delete_many()
            .filter(offline_episodes::Column::TmdbId.eq(tmdb_id))
            .filter(offline_episodes::Column::SeasonNumber.eq(season_number))
            .filter(offline_episodes::Column::EpisodeNumber.eq(episode_number))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    // ========================================================================
    // Seasons
    // ========================================================================

    pub async fn season(&self, tmdb_id: i32, season_number: i32) -> Result<Option<OfflineSeason>> {
        let row = OfflineSeasons::find_by_id((tmdb_id, season_number))
            .one(&self.conn)
            .await?;

        Ok(row.map(Self::map_season))
    }

    pub async fn seasons(&self, tmdb_id: i32) -> Result<Vec<OfflineSeason>> {
        let rows = OfflineSeasons::find()
            .filter(offline_seasons::Column::TmdbId.eq(tmdb_id))
            .order_by_asc(offline_seasons::Column::SeasonNumber)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_season).collect())
    }

    pub async fn upsert_season(&self, season: &OfflineSeason) -> Result<()> {
        let active_model = offline_seasons::ActiveModel {
            tmdb_id: Set(season.tmdb_id),
            season_number: Set(season.season_number),
            json: Set(season.json.clone()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        OfflineSeasons::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    offline_seasons::Column::TmdbId,
                    offline_seasons::Column::SeasonNumber,
                ])
                .update_column(offline_seasons::Column::Json)
                .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn delete_season(&self, tmdb_id: i32, season_number: i32) -> Result<bool> {
        let result = OfflineSeasons::delete_by_id((tmdb_id, season_number))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    // ========================================================================
    // Shows
    // ========================================================================

    pub async fn shows(&self) -> Result<Vec<OfflineShow>> {
        let rows = OfflineShows::find()
            .order_by_asc(offline_shows::Column::Name)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_show).collect())
    }

    pub async fn upsert_show(&self, show: &OfflineShow) -> Result<()> {
        let active_model = offline_shows::ActiveModel {
            tmdb_id: Set(show.tmdb_id),
            name: Set(show.name.clone()),
            poster_path: Set(show.poster_path.clone()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        OfflineShows::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(offline_shows::Column::TmdbId)
                    .update_columns([
                        offline_shows::Column::Name,
                        offline_shows::Column::PosterPath,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn delete_show(&self, tmdb_id: i32) -> Result<bool> {
        let result = OfflineShows::delete_by_id(tmdb_id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
