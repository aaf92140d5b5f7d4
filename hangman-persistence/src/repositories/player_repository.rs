use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::{game_sessions, players, prelude::*};
use hangman_core::PlayerDirectory;
use hangman_types::{GameError, Player, PlayerId};

pub struct PlayerRepository {
    db: DatabaseConnection,
}

impl PlayerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_player(model: players::Model) -> Player {
        Player {
            id: model.id,
            name: model.name,
            registered_at: model.created_at.to_rfc3339(),
        }
    }

    fn validate_name(name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::InvalidPlayerName.into());
        }
        Ok(name.to_string())
    }

    pub async fn find_all(&self) -> Result<Vec<Player>> {
        let players = Players::find()
            .order_by_asc(players::Column::Name)
            .all(&self.db)
            .await?;

        Ok(players.into_iter().map(Self::model_to_player).collect())
    }

    pub async fn find_player(&self, id: PlayerId) -> Result<Option<Player>> {
        let player_model = Players::find_by_id(id).one(&self.db).await?;
        Ok(player_model.map(Self::model_to_player))
    }

    pub async fn create_player(&self, name: &str) -> Result<Player> {
        let name = Self::validate_name(name)?;
        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();

        let player_model = players::ActiveModel {
            id: sea_orm::ActiveValue::Set(Uuid::new_v4()),
            name: sea_orm::ActiveValue::Set(name),
            created_at: sea_orm::ActiveValue::Set(now),
            updated_at: sea_orm::ActiveValue::Set(now),
        };

        let created = player_model.insert(&self.db).await?;
        info!("Created player {} ({})", created.name, created.id);
        Ok(Self::model_to_player(created))
    }

    /// Rename a player. Returns `None` if the player does not exist.
    pub async fn update_player(&self, id: PlayerId, name: &str) -> Result<Option<Player>> {
        let name = Self::validate_name(name)?;

        let Some(player) = Players::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let updated_player = players::ActiveModel {
            id: sea_orm::ActiveValue::Unchanged(player.id),
            name: sea_orm::ActiveValue::Set(name),
            created_at: sea_orm::ActiveValue::Unchanged(player.created_at),
            updated_at: sea_orm::ActiveValue::Set(chrono::Utc::now().into()),
        };

        let updated = updated_player.update(&self.db).await?;
        Ok(Some(Self::model_to_player(updated)))
    }

    /// Delete a player together with their in-progress session. Finished
    /// games stay in the ledger under the recorded name.
    pub async fn delete_player(&self, id: PlayerId) -> Result<bool> {
        let txn = self.db.begin().await?;

        GameSessions::delete_many()
            .filter(game_sessions::Column::PlayerId.eq(id))
            .exec(&txn)
            .await?;
        let deleted = Players::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        if deleted.rows_affected > 0 {
            info!("Deleted player {}", id);
        }
        Ok(deleted.rows_affected > 0)
    }
}

#[async_trait]
impl PlayerDirectory for PlayerRepository {
    async fn find_by_id(&self, id: PlayerId) -> Result<Option<Player>> {
        self.find_player(id).await
    }
}
