use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, SqlErr,
};
use tracing::{debug, warn};

use crate::entities::{game_sessions, prelude::*};
use hangman_core::letter_set;
use hangman_core::{Session, SessionStore, VersionConflict};
use hangman_types::{PlayerId, SessionId, Word, WordId};

pub struct SessionRepository {
    db: DatabaseConnection,
}

impl SessionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn model_to_session(&self, model: game_sessions::Model) -> Result<Session> {
        let word = Words::find_by_id(model.word_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| anyhow!("Word {} of session {} not found", model.word_id, model.id))?;

        Ok(Session {
            id: model.id,
            player_id: model.player_id,
            word: Word {
                id: word.id,
                text: word.text,
                used: word.used,
            },
            guessed_letters: letter_set::decode(Some(&model.guessed_letters)),
            remaining_attempts: model.remaining_attempts,
            started_at: model.started_at.with_timezone(&Utc),
            version: model.version,
        })
    }

    fn conflict(session: &Session) -> anyhow::Error {
        warn!(
            "Rejected stale write of session {} for player {}",
            session.id, session.player_id
        );
        VersionConflict {
            session_id: session.id,
            player_id: session.player_id,
        }
        .into()
    }

    async fn insert(&self, session: &Session) -> Result<Session> {
        let session_model = game_sessions::ActiveModel {
            id: sea_orm::ActiveValue::Set(session.id),
            player_id: sea_orm::ActiveValue::Set(session.player_id),
            word_id: sea_orm::ActiveValue::Set(session.word.id),
            guessed_letters: sea_orm::ActiveValue::Set(letter_set::encode(
                &session.guessed_letters,
            )),
            remaining_attempts: sea_orm::ActiveValue::Set(session.remaining_attempts),
            version: sea_orm::ActiveValue::Set(1),
            started_at: sea_orm::ActiveValue::Set(session.started_at.into()),
        };

        match session_model.insert(&self.db).await {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => return Err(Self::conflict(session)),
            Err(err) => return Err(err.into()),
        }

        let mut stored = session.clone();
        stored.version = 1;
        Ok(stored)
    }

    async fn update(&self, session: &Session) -> Result<Session> {
        let next_version = session.version + 1;

        let result = GameSessions::update_many()
            .col_expr(
                game_sessions::Column::GuessedLetters,
                Expr::value(letter_set::encode(&session.guessed_letters)),
            )
            .col_expr(
                game_sessions::Column::RemainingAttempts,
                Expr::value(session.remaining_attempts),
            )
            .col_expr(game_sessions::Column::Version, Expr::value(next_version))
            .filter(game_sessions::Column::Id.eq(session.id))
            .filter(game_sessions::Column::Version.eq(session.version))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(Self::conflict(session));
        }

        let mut stored = session.clone();
        stored.version = next_version;
        Ok(stored)
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn find_by_player_and_word(
        &self,
        player_id: PlayerId,
        word_id: WordId,
    ) -> Result<Option<Session>> {
        let session_model = GameSessions::find()
            .filter(game_sessions::Column::PlayerId.eq(player_id))
            .filter(game_sessions::Column::WordId.eq(word_id))
            .one(&self.db)
            .await?;

        match session_model {
            Some(model) => Ok(Some(self.model_to_session(model).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_player(&self, player_id: PlayerId) -> Result<Option<Session>> {
        let session_model = GameSessions::find()
            .filter(game_sessions::Column::PlayerId.eq(player_id))
            .one(&self.db)
            .await?;

        match session_model {
            Some(model) => Ok(Some(self.model_to_session(model).await?)),
            None => Ok(None),
        }
    }

    async fn save(&self, session: &Session) -> Result<Session> {
        debug!(
            "Saving session {} (version {}) for player {}",
            session.id, session.version, session.player_id
        );
        if session.version == 0 {
            self.insert(session).await
        } else {
            self.update(session).await
        }
    }

    async fn delete(&self, session_id: SessionId) -> Result<()> {
        GameSessions::delete_by_id(session_id).exec(&self.db).await?;
        Ok(())
    }
}
