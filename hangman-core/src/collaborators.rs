//! Narrow interfaces to the services surrounding a game session.
//!
//! The database-backed implementations live in `hangman-persistence`;
//! [`crate::memory::InMemoryStore`] implements all of them for tests.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hangman_types::{
    CompletedGameView, GameId, GameResult, Player, PlayerId, SessionId, Word, WordId,
};
use uuid::Uuid;

use crate::session::Session;

/// Ledger record of a finished session
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedGame {
    pub id: GameId,
    pub player_id: PlayerId,
    pub player_name: String,
    pub word_id: WordId,
    pub word: String,
    pub result: GameResult,
    pub score: i32,
    pub played_at: DateTime<Utc>,
}

impl CompletedGame {
    pub fn new(player: &Player, word: &Word, result: GameResult, score: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            player_id: player.id,
            player_name: player.name.clone(),
            word_id: word.id,
            word: word.text.clone(),
            result,
            score,
            played_at: Utc::now(),
        }
    }

    /// Ledger record for a finished session, keyed by the session id so a
    /// retried finish maps to the same row. `None` while the session is
    /// still active.
    pub fn for_session(player: &Player, session: &Session) -> Option<Self> {
        let result = session.state().result()?;
        Some(Self {
            id: session.id,
            ..Self::new(player, &session.word, result, session.score())
        })
    }
}

impl From<&CompletedGame> for CompletedGameView {
    fn from(game: &CompletedGame) -> Self {
        CompletedGameView {
            id: game.id,
            player_id: game.player_id,
            player_name: game.player_name.clone(),
            result: game.result,
            score: game.score,
            played_at: game.played_at.to_rfc3339(),
            word: game.word.clone(),
        }
    }
}

/// Raised by [`SessionStore::save`] when the stored session changed since it
/// was loaded, or the player's slot is already taken by another session.
#[derive(Debug, Clone, thiserror::Error)]
#[error("session {session_id} for player {player_id} was modified concurrently")]
pub struct VersionConflict {
    pub session_id: SessionId,
    pub player_id: PlayerId,
}

#[async_trait]
pub trait PlayerDirectory: Send + Sync {
    async fn find_by_id(&self, id: PlayerId) -> Result<Option<Player>>;
}

#[async_trait]
pub trait WordCatalog: Send + Sync {
    async fn find_random_unused(&self) -> Result<Option<Word>>;

    async fn mark_used(&self, word_id: WordId) -> Result<()>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn find_by_player_and_word(
        &self,
        player_id: PlayerId,
        word_id: WordId,
    ) -> Result<Option<Session>>;

    /// The single in-progress session a player may hold
    async fn find_by_player(&self, player_id: PlayerId) -> Result<Option<Session>>;

    /// Insert (version 0) or update the session, returning the stored copy
    /// with its version bumped. Fails with [`VersionConflict`] on a stale
    /// version or an occupied player slot.
    async fn save(&self, session: &Session) -> Result<Session>;

    async fn delete(&self, session_id: SessionId) -> Result<()>;
}

#[async_trait]
pub trait GameLedger: Send + Sync {
    /// Record a finished game. Appending a game id that is already recorded
    /// leaves the ledger unchanged.
    async fn append(&self, game: &CompletedGame) -> Result<()>;

    async fn find_by_player(&self, player_id: PlayerId) -> Result<Vec<CompletedGame>>;

    async fn find_all(&self) -> Result<Vec<CompletedGame>>;
}
