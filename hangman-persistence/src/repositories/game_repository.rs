use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::{debug, info};

use crate::entities::{completed_games, prelude::*};
use hangman_core::{CompletedGame, GameLedger};
use hangman_types::{GameResult, PlayerId};

/// Append-only ledger of finished games
pub struct GameRepository {
    db: DatabaseConnection,
}

impl GameRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_game(model: completed_games::Model) -> Result<CompletedGame> {
        let result = model
            .result
            .parse::<GameResult>()
            .map_err(|e| anyhow!("Completed game {}: {}", model.id, e))?;

        Ok(CompletedGame {
            id: model.id,
            player_id: model.player_id,
            player_name: model.player_name,
            word_id: model.word_id,
            word: model.word,
            result,
            score: model.score,
            played_at: model.played_at.with_timezone(&Utc),
        })
    }
}

#[async_trait]
impl GameLedger for GameRepository {
    async fn append(&self, game: &CompletedGame) -> Result<()> {
        let game_model = completed_games::ActiveModel {
            id: sea_orm::ActiveValue::Set(game.id),
            player_id: sea_orm::ActiveValue::Set(game.player_id),
            player_name: sea_orm::ActiveValue::Set(game.player_name.clone()),
            word_id: sea_orm::ActiveValue::Set(game.word_id),
            word: sea_orm::ActiveValue::Set(game.word.clone()),
            result: sea_orm::ActiveValue::Set(game.result.as_str().to_string()),
            score: sea_orm::ActiveValue::Set(game.score),
            played_at: sea_orm::ActiveValue::Set(game.played_at.into()),
        };

        let inserted = CompletedGames::insert(game_model)
            .on_conflict(
                OnConflict::column(completed_games::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        if inserted == 0 {
            debug!("Game {} was already recorded", game.id);
            return Ok(());
        }

        info!(
            "Recorded {} game {} for player {} with score {}",
            game.result, game.id, game.player_id, game.score
        );
        Ok(())
    }

    async fn find_by_player(&self, player_id: PlayerId) -> Result<Vec<CompletedGame>> {
        CompletedGames::find()
            .filter(completed_games::Column::PlayerId.eq(player_id))
            .order_by_asc(completed_games::Column::PlayedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Self::model_to_game)
            .collect()
    }

    async fn find_all(&self) -> Result<Vec<CompletedGame>> {
        CompletedGames::find()
            .order_by_asc(completed_games::Column::PlayedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Self::model_to_game)
            .collect()
    }
}
