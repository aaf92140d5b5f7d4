use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::ServiceError;
use hangman_core::{
    CompletedGame, GameLedger, PlayerDirectory, Session, SessionStore, WordCatalog,
    build_scoreboard,
};
use hangman_types::{
    CompletedGameView, GameError, GameSnapshot, Player, PlayerId, ScoreboardEntry,
};

/// Coordinates players, the word catalog, in-progress sessions and the
/// ledger of finished games.
///
/// Calls for the same player run one at a time in arrival order; different
/// players proceed in parallel.
pub struct GameManager {
    players: Arc<dyn PlayerDirectory>,
    words: Arc<dyn WordCatalog>,
    sessions: Arc<dyn SessionStore>,
    ledger: Arc<dyn GameLedger>,
    player_locks: DashMap<PlayerId, Arc<Mutex<()>>>,
}

impl GameManager {
    pub fn new(
        players: Arc<dyn PlayerDirectory>,
        words: Arc<dyn WordCatalog>,
        sessions: Arc<dyn SessionStore>,
        ledger: Arc<dyn GameLedger>,
    ) -> Self {
        Self {
            players,
            words,
            sessions,
            ledger,
            player_locks: DashMap::new(),
        }
    }

    /// Build a manager on top of one store implementing every collaborator
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: PlayerDirectory + WordCatalog + SessionStore + GameLedger + 'static,
    {
        Self::new(store.clone(), store.clone(), store.clone(), store)
    }

    fn player_lock(&self, player_id: PlayerId) -> Arc<Mutex<()>> {
        self.player_locks
            .entry(player_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the player's lock entry once no other call holds or waits on it
    fn release_player_lock(&self, player_id: PlayerId, lock: Arc<Mutex<()>>) {
        drop(lock);
        self.player_locks
            .remove_if(&player_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    /// Players with a call currently holding or waiting on their lock
    pub fn locked_players(&self) -> usize {
        self.player_locks.len()
    }

    async fn resolve_player(&self, player_id: PlayerId) -> Result<Player, ServiceError> {
        self.players
            .find_by_id(player_id)
            .await?
            .ok_or(ServiceError::Game(GameError::PlayerNotFound { player_id }))
    }

    pub async fn start_game(&self, player_id: PlayerId) -> Result<GameSnapshot, ServiceError> {
        let player = self.resolve_player(player_id).await?;

        let lock = self.player_lock(player_id);
        let result = {
            let _guard = lock.lock().await;
            self.start_game_locked(&player).await
        };
        self.release_player_lock(player_id, lock);
        result
    }

    async fn start_game_locked(&self, player: &Player) -> Result<GameSnapshot, ServiceError> {
        let player_id = player.id;

        let mut word = self
            .words
            .find_random_unused()
            .await?
            .ok_or(ServiceError::Game(GameError::NoWordsAvailable))?;
        // Offered words are burned even if the player resumes another game
        self.words.mark_used(word.id).await?;
        word.used = true;
        debug!("Offered word {} to player {}", word.id, player_id);

        if let Some(existing) = self
            .sessions
            .find_by_player_and_word(player_id, word.id)
            .await?
        {
            return Ok(existing.snapshot());
        }

        if let Some(existing) = self.sessions.find_by_player(player_id).await? {
            if !existing.is_terminal() {
                info!(
                    "Player {} resumed session {} instead of starting a new game",
                    player_id, existing.id
                );
                return Ok(existing.snapshot());
            }
            // Left over from an interrupted finish
            self.finish_session(player, &existing).await?;
        }

        let session = self.sessions.save(&Session::new(player_id, word)).await?;
        info!("Player {} started session {}", player_id, session.id);
        Ok(session.snapshot())
    }

    pub async fn make_guess(
        &self,
        player_id: PlayerId,
        letter: char,
    ) -> Result<GameSnapshot, ServiceError> {
        let player = self.resolve_player(player_id).await?;

        let lock = self.player_lock(player_id);
        let result = {
            let _guard = lock.lock().await;
            self.make_guess_locked(&player, letter).await
        };
        self.release_player_lock(player_id, lock);
        result
    }

    async fn make_guess_locked(
        &self,
        player: &Player,
        letter: char,
    ) -> Result<GameSnapshot, ServiceError> {
        let player_id = player.id;

        let mut session = self
            .sessions
            .find_by_player(player_id)
            .await?
            .ok_or(ServiceError::Game(GameError::NoActiveSession { player_id }))?;

        let outcome = session.apply_guess(letter);
        if outcome.repeated {
            debug!(
                "Player {} repeated letter '{}' in session {}",
                player_id, letter, session.id
            );
        } else {
            session = self.sessions.save(&session).await?;
        }

        if outcome.state.is_terminal() {
            self.finish_session(player, &session).await?;
        }

        Ok(outcome.snapshot)
    }

    /// Record a finished session in the ledger and free the player's slot.
    ///
    /// The ledger row is keyed by the session id, so finishing the same
    /// session again after a failed step records nothing new.
    async fn finish_session(&self, player: &Player, session: &Session) -> Result<(), ServiceError> {
        let Some(game) = CompletedGame::for_session(player, session) else {
            warn!("Refusing to finish active session {}", session.id);
            return Ok(());
        };

        if !session.word.used {
            self.words.mark_used(session.word.id).await?;
        }

        self.ledger.append(&game).await?;
        self.sessions.delete(session.id).await?;

        info!(
            "Player {} finished session {}: {} with score {}",
            player.id, session.id, game.result, game.score
        );
        Ok(())
    }

    pub async fn list_games_by_player(
        &self,
        player_id: PlayerId,
    ) -> Result<Vec<CompletedGameView>, ServiceError> {
        let games = self.ledger.find_by_player(player_id).await?;
        Ok(games.iter().map(CompletedGameView::from).collect())
    }

    pub async fn list_all_games(&self) -> Result<Vec<CompletedGameView>, ServiceError> {
        let games = self.ledger.find_all().await?;
        Ok(games.iter().map(CompletedGameView::from).collect())
    }

    /// Ranking over the given players plus anyone else found in the ledger
    pub async fn scoreboard(&self, players: &[Player]) -> Result<Vec<ScoreboardEntry>, ServiceError> {
        let games = self.ledger.find_all().await?;
        Ok(build_scoreboard(players, &games))
    }

    pub async fn scoreboard_for_player(
        &self,
        player_id: PlayerId,
    ) -> Result<ScoreboardEntry, ServiceError> {
        let player = self.resolve_player(player_id).await?;
        let games = self.ledger.find_by_player(player_id).await?;

        build_scoreboard(std::slice::from_ref(&player), &games)
            .into_iter()
            .next()
            .ok_or(ServiceError::Game(GameError::PlayerNotFound { player_id }))
    }
}
