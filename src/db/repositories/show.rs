use crate::entities::{prelude::*, saved_shows};
use crate::models::show::SavedShow;
use anyhow::Result;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, Set};

/// Repository for shows saved to the library
pub struct ShowRepository {
    conn: DatabaseConnection,
}

impl ShowRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(m: saved_shows::Model) -> SavedShow {
        SavedShow {
            tmdb_id: m.tmdb_id,
            name: m.name,
            poster_path: m.poster_path,
            file_id: m.file_id,
        }
    }

    pub async fn get(&self, tmdb_id: i32) -> Result<Option<SavedShow>> {
        let row = SavedShows::find_by_id(tmdb_id).one(&self.conn).await?;
        Ok(row.map(Self::map_model))
    }

    pub async fn list(&self) -> Result<Vec<SavedShow>> {
        let rows = SavedShows::find()
            .order_by_asc(saved_shows::Column::Name)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn upsert(&self, show: &SavedShow) -> Result<()> {
        let active_model = saved_shows::ActiveModel {
            tmdb_id: Set(show.tmdb_id),
            name: Set(show.name.clone()),
            poster_path: Set(show.poster_path.clone()),
            file_id: Set(show.file_id.clone()),
            added_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        SavedShows::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(saved_shows::Column::TmdbId)
                    .update_columns([
                        saved_shows::Column::Name,
                        saved_shows::Column::PosterPath,
                        saved_shows::Column::FileId,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(())
    }
}
