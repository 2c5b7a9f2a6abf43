use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_watched_episodes_season_recent")
                    .table(WatchedEpisodes::Table)
                    .col(WatchedEpisodes::TmdbId)
                    .col(WatchedEpisodes::SeasonNumber)
                    .col(WatchedEpisodes::UpdatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_watched_episodes_season_recent")
                    .table(WatchedEpisodes::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum WatchedEpisodes {
    Table,
    TmdbId,
    SeasonNumber,
    UpdatedAt,
}
