use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use hangman_types::{Player, PlayerId, SessionId, Word, WordId};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::collaborators::{
    CompletedGame, GameLedger, PlayerDirectory, SessionStore, VersionConflict, WordCatalog,
};
use crate::session::Session;

#[derive(Debug, Default)]
struct StoreState {
    players: HashMap<PlayerId, Player>,
    words: Vec<Word>,
    sessions: HashMap<PlayerId, Session>,
    games: Vec<CompletedGame>,
}

/// Process-local implementation of every collaborator.
///
/// Word selection is deterministic: the first unused word in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add_player(&self, name: &str) -> Player {
        let player = Player {
            id: Uuid::new_v4(),
            name: name.to_string(),
            registered_at: Utc::now().to_rfc3339(),
        };
        self.state().players.insert(player.id, player.clone());
        player
    }

    pub fn add_word(&self, text: &str) -> Word {
        let word = Word {
            id: Uuid::new_v4(),
            text: text.to_uppercase(),
            used: false,
        };
        self.state().words.push(word.clone());
        word
    }

    pub fn players(&self) -> Vec<Player> {
        self.state().players.values().cloned().collect()
    }

    pub fn words(&self) -> Vec<Word> {
        self.state().words.clone()
    }

    pub fn session_count(&self) -> usize {
        self.state().sessions.len()
    }
}

#[async_trait]
impl PlayerDirectory for InMemoryStore {
    async fn find_by_id(&self, id: PlayerId) -> Result<Option<Player>> {
        Ok(self.state().players.get(&id).cloned())
    }
}

#[async_trait]
impl WordCatalog for InMemoryStore {
    async fn find_random_unused(&self) -> Result<Option<Word>> {
        Ok(self.state().words.iter().find(|w| !w.used).cloned())
    }

    async fn mark_used(&self, word_id: WordId) -> Result<()> {
        let mut state = self.state();
        if let Some(word) = state.words.iter_mut().find(|w| w.id == word_id) {
            word.used = true;
        }
        for session in state.sessions.values_mut() {
            if session.word.id == word_id {
                session.word.used = true;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn find_by_player_and_word(
        &self,
        player_id: PlayerId,
        word_id: WordId,
    ) -> Result<Option<Session>> {
        Ok(self
            .state()
            .sessions
            .get(&player_id)
            .filter(|s| s.word.id == word_id)
            .cloned())
    }

    async fn find_by_player(&self, player_id: PlayerId) -> Result<Option<Session>> {
        Ok(self.state().sessions.get(&player_id).cloned())
    }

    async fn save(&self, session: &Session) -> Result<Session> {
        let mut state = self.state();
        let conflict = VersionConflict {
            session_id: session.id,
            player_id: session.player_id,
        };

        match state.sessions.get(&session.player_id) {
            Some(stored) if stored.id != session.id => return Err(conflict.into()),
            Some(stored) if stored.version != session.version => return Err(conflict.into()),
            None if session.version != 0 => return Err(conflict.into()),
            _ => {}
        }

        let mut stored = session.clone();
        stored.version += 1;
        state.sessions.insert(stored.player_id, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, session_id: SessionId) -> Result<()> {
        self.state().sessions.retain(|_, s| s.id != session_id);
        Ok(())
    }
}

#[async_trait]
impl GameLedger for InMemoryStore {
    async fn append(&self, game: &CompletedGame) -> Result<()> {
        let mut state = self.state();
        if !state.games.iter().any(|g| g.id == game.id) {
            state.games.push(game.clone());
        }
        Ok(())
    }

    async fn find_by_player(&self, player_id: PlayerId) -> Result<Vec<CompletedGame>> {
        Ok(self
            .state()
            .games
            .iter()
            .filter(|g| g.player_id == player_id)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<CompletedGame>> {
        Ok(self.state().games.clone())
    }
}
