use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CompletedGames::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CompletedGames::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CompletedGames::PlayerId).uuid().not_null())
                    .col(ColumnDef::new(CompletedGames::PlayerName).string().not_null())
                    .col(ColumnDef::new(CompletedGames::WordId).uuid().not_null())
                    .col(ColumnDef::new(CompletedGames::Word).string().not_null())
                    .col(ColumnDef::new(CompletedGames::Result).string().not_null())
                    .col(
                        ColumnDef::new(CompletedGames::Score)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CompletedGames::PlayedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create index on player_id for per-player history queries
        manager
            .create_index(
                Index::create()
                    .name("idx_completed_games_player")
                    .table(CompletedGames::Table)
                    .col(CompletedGames::PlayerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CompletedGames::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CompletedGames {
    Table,
    Id,
    PlayerId,
    PlayerName,
    WordId,
    Word,
    Result,
    Score,
    PlayedAt,
}
