use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GameSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameSessions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GameSessions::PlayerId).uuid().not_null())
                    .col(ColumnDef::new(GameSessions::WordId).uuid().not_null())
                    .col(
                        ColumnDef::new(GameSessions::GuessedLetters)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(GameSessions::RemainingAttempts)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameSessions::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(GameSessions::StartedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // One in-progress session per player
        manager
            .create_index(
                Index::create()
                    .name("idx_game_sessions_player")
                    .table(GameSessions::Table)
                    .col(GameSessions::PlayerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GameSessions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum GameSessions {
    Table,
    Id,
    PlayerId,
    WordId,
    GuessedLetters,
    RemainingAttempts,
    Version,
    StartedAt,
}
