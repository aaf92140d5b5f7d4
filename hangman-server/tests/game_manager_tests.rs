
use hangman_core::{GameLedger, InMemoryStore, Session, SessionStore};
use hangman_server::error::ServiceError;
use hangman_server::game_manager::GameManager;
use hangman_types::{GameError, GameResult};
use std::sync::Arc;
use test_helpers::*;
use uuid::Uuid;

#[tokio::test]
async fn test_start_game_basic() {
    let setup = TestGameServerSetup::with_words(&["gato"]);
    let player = setup.create_player("Juan");

    let snapshot = setup.game_manager.start_game(player.id).await.unwrap();
    assert_eq!(snapshot.hidden_word, "____");
    assert!(snapshot.guessed_letters.is_empty());
    assert_eq!(snapshot.remaining_attempts, 7);
    assert!(!snapshot.is_complete);
    assert_eq!(snapshot.score, 0);

    assert!(setup.has_active_session(&player).await);
    // Burned the moment it was offered
    assert!(setup.word("GATO").unwrap().used);
}

#[tokio::test]
async fn test_win_is_recorded_once() {
    let setup = TestGameServerSetup::with_words(&["gato"]);
    let player = setup.create_player("Juan");
    setup.game_manager.start_game(player.id).await.unwrap();

    let mut hidden = Vec::new();
    for letter in ['G', 'A', 'T', 'O'] {
        let snapshot = setup.game_manager.make_guess(player.id, letter).await.unwrap();
        hidden.push(snapshot.hidden_word);
    }
    assert_eq!(hidden, vec!["G___", "GA__", "GAT_", "GATO"]);

    let games = setup
        .game_manager
        .list_games_by_player(player.id)
        .await
        .unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].result, GameResult::Won);
    assert_eq!(games[0].score, 20);
    assert_eq!(games[0].word, "GATO");
    assert_eq!(games[0].player_name, "Juan");

    assert!(!setup.has_active_session(&player).await);
    assert_eq!(setup.ledger_size().await, 1);
}

#[tokio::test]
async fn test_loss_without_correct_letters() {
    let setup = TestGameServerSetup::with_words(&["sol"]);
    let player = setup.create_player("Juan");
    setup.game_manager.start_game(player.id).await.unwrap();

    let snapshot = setup.play(&player, "XQZWJKV").await;
    assert_eq!(snapshot.remaining_attempts, 0);
    assert!(!snapshot.is_complete);
    assert_eq!(snapshot.score, 0);
    assert_eq!(snapshot.hidden_word, "___");

    let games = setup.game_manager.list_all_games().await.unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].result, GameResult::Lost);
    assert_eq!(games[0].score, 0);
    assert!(!setup.has_active_session(&player).await);
}

#[tokio::test]
async fn test_loss_scores_correct_letters() {
    let setup = TestGameServerSetup::with_words(&["sol"]);
    let player = setup.create_player("Juan");
    setup.game_manager.start_game(player.id).await.unwrap();

    let snapshot = setup.play(&player, "SXQZWJKV").await;
    assert_eq!(snapshot.remaining_attempts, 0);
    assert_eq!(snapshot.hidden_word, "S__");
    assert_eq!(snapshot.score, 1);

    let games = setup.game_manager.list_all_games().await.unwrap();
    assert_eq!(games[0].result, GameResult::Lost);
    assert_eq!(games[0].score, 1);
}

#[tokio::test]
async fn test_lowercase_letters_match() {
    let setup = TestGameServerSetup::with_words(&["sol"]);
    let player = setup.create_player("Juan");
    setup.game_manager.start_game(player.id).await.unwrap();

    let snapshot = setup.game_manager.make_guess(player.id, 's').await.unwrap();
    assert_eq!(snapshot.hidden_word, "S__");
    assert_eq!(snapshot.guessed_letters, vec!['S']);

    // Same letter in the other case is a repeat
    let repeat = setup.game_manager.make_guess(player.id, 'S').await.unwrap();
    assert_eq!(repeat, snapshot);
}

#[tokio::test]
async fn test_repeat_guess_is_a_no_op() {
    let setup = TestGameServerSetup::with_words(&["sol"]);
    let player = setup.create_player("Juan");
    setup.game_manager.start_game(player.id).await.unwrap();

    let first = setup.game_manager.make_guess(player.id, 'X').await.unwrap();
    let second = setup.game_manager.make_guess(player.id, 'X').await.unwrap();
    assert_eq!(first, second);
    assert_eq!(second.remaining_attempts, 6);
}

#[tokio::test]
async fn test_start_twice_resumes_session() {
    let setup = TestGameServerSetup::with_words(&["gato", "sol"]);
    let player = setup.create_player("Juan");

    let first = setup.game_manager.start_game(player.id).await.unwrap();
    setup.game_manager.make_guess(player.id, 'A').await.unwrap();
    let expected = setup.game_manager.make_guess(player.id, 'A').await.unwrap();

    let second = setup.game_manager.start_game(player.id).await.unwrap();
    assert_eq!(first.hidden_word, "____");
    assert_eq!(second, expected);
    assert_eq!(second.hidden_word, "_A__");
    assert_eq!(setup.store.session_count(), 1);

    // The second draw was burned anyway
    assert!(setup.word("SOL").unwrap().used);

    // Guesses still go to the first word
    let snapshot = setup.play(&player, "GTO").await;
    assert!(snapshot.is_complete);
    assert_eq!(snapshot.hidden_word, "GATO");
}

#[tokio::test]
async fn test_guess_without_session() {
    let setup = TestGameServerSetup::with_words(&["gato"]);
    let player = setup.create_player("Juan");

    let err = setup
        .game_manager
        .make_guess(player.id, 'A')
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Game(GameError::NoActiveSession { player_id }) if player_id == player.id
    ));
}

#[tokio::test]
async fn test_start_with_empty_catalog() {
    let setup = TestGameServerSetup::new();
    let player = setup.create_player("Juan");

    let err = setup.game_manager.start_game(player.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::Game(GameError::NoWordsAvailable)));
    assert!(!setup.has_active_session(&player).await);
}

#[tokio::test]
async fn test_catalog_exhausted_after_every_word_is_offered() {
    let setup = TestGameServerSetup::with_words(&["sol"]);
    let juan = setup.create_player("Juan");
    let ana = setup.create_player("Ana");

    setup.game_manager.start_game(juan.id).await.unwrap();
    let err = setup.game_manager.start_game(ana.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::Game(GameError::NoWordsAvailable)));
}

#[tokio::test]
async fn test_unknown_player() {
    let setup = TestGameServerSetup::with_words(&["gato"]);
    let stranger = Uuid::new_v4();

    let err = setup.game_manager.start_game(stranger).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Game(GameError::PlayerNotFound { .. })
    ));

    let err = setup.game_manager.make_guess(stranger, 'A').await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Game(GameError::PlayerNotFound { .. })
    ));

    // Nothing was drawn for the unknown player
    assert!(!setup.word("GATO").unwrap().used);

    let err = setup
        .game_manager
        .scoreboard_for_player(stranger)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Game(GameError::PlayerNotFound { .. })
    ));
}

#[tokio::test]
async fn test_new_game_after_finishing() {
    let setup = TestGameServerSetup::with_words(&["sol", "gato"]);
    let player = setup.create_player("Juan");

    setup.game_manager.start_game(player.id).await.unwrap();
    setup.play(&player, "SOL").await;

    let snapshot = setup.game_manager.start_game(player.id).await.unwrap();
    assert_eq!(snapshot.hidden_word, "____");
    assert_eq!(snapshot.remaining_attempts, 7);
    assert_eq!(setup.store.session_count(), 1);
}

#[tokio::test]
async fn test_leftover_finished_session_is_recorded_on_start() {
    let setup = TestGameServerSetup::with_words(&["gato"]);
    let player = setup.create_player("Juan");
    let sol = setup.store.add_word("sol");

    // A won session that never made it to the ledger
    let mut session = Session::new(player.id, sol);
    for letter in ['S', 'O', 'L'] {
        session.apply_guess(letter);
    }
    assert!(session.is_terminal());
    setup.store.save(&session).await.unwrap();

    let snapshot = setup.game_manager.start_game(player.id).await.unwrap();
    assert_eq!(snapshot.hidden_word, "____");

    let games = setup
        .game_manager
        .list_games_by_player(player.id)
        .await
        .unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].word, "SOL");
    assert_eq!(games[0].result, GameResult::Won);
    assert!(setup.word("SOL").unwrap().used);
}

#[tokio::test]
async fn test_scoreboard_totals() {
    let setup = TestGameServerSetup::with_words(&["sol", "gato", "luz"]);
    let juan = setup.create_player("Juan");
    let ana = setup.create_player("Ana");
    let bea = setup.create_player("Bea");

    // Juan wins SOL
    setup.game_manager.start_game(juan.id).await.unwrap();
    setup.play(&juan, "SOL").await;

    // Ana loses GATO with two correct letters
    setup.game_manager.start_game(ana.id).await.unwrap();
    setup.play(&ana, "GABCDEFHI").await;

    // Juan loses LUZ without a correct letter
    setup.game_manager.start_game(juan.id).await.unwrap();
    setup.play(&juan, "ABCDEFG").await;

    let scoreboard = setup
        .game_manager
        .scoreboard(&setup.store.players())
        .await
        .unwrap();
    assert_eq!(scoreboard.len(), 3);

    assert_eq!(scoreboard[0].player_id, juan.id);
    assert_eq!(scoreboard[0].total_score, 20);
    assert_eq!(scoreboard[0].games_played, 2);
    assert_eq!(scoreboard[0].games_won, 1);
    assert_eq!(scoreboard[0].games_lost, 1);

    assert_eq!(scoreboard[1].player_id, ana.id);
    assert_eq!(scoreboard[1].total_score, 2);
    assert_eq!(scoreboard[1].games_lost, 1);

    assert_eq!(scoreboard[2].player_id, bea.id);
    assert_eq!(scoreboard[2].games_played, 0);

    let entry = setup
        .game_manager
        .scoreboard_for_player(ana.id)
        .await
        .unwrap();
    assert_eq!(entry.total_score, 2);
    assert_eq!(entry.games_played, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_guesses_are_serialized() {
    let setup = TestGameServerSetup::with_words(&["sol"]);
    let player = setup.create_player("Juan");
    setup.game_manager.start_game(player.id).await.unwrap();

    let mut handles = Vec::new();
    for letter in ['X', 'Q', 'Z', 'W', 'S', 'O'] {
        let game_manager = Arc::clone(&setup.game_manager);
        let player_id = player.id;
        handles.push(tokio::spawn(async move {
            game_manager.make_guess(player_id, letter).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().expect("no guess should conflict");
    }

    let session = SessionStore::find_by_player(setup.store.as_ref(), player.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.guessed_letters.len(), 6);
    assert_eq!(session.remaining_attempts, 3);
    assert_eq!(session.hidden_word(), "SO_");
    // One insert plus one write per guess
    assert_eq!(session.version, 7);
    assert_eq!(setup.game_manager.locked_players(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_starts_create_one_session() {
    let setup = TestGameServerSetup::with_words(&["sol", "gato", "luz", "mar"]);
    let player = setup.create_player("Juan");

    let mut handles = Vec::new();
    for _ in 0..4 {
        let game_manager = Arc::clone(&setup.game_manager);
        let player_id = player.id;
        handles.push(tokio::spawn(async move {
            game_manager.start_game(player_id).await
        }));
    }

    let mut snapshots = Vec::new();
    for handle in handles {
        snapshots.push(handle.await.unwrap().unwrap());
    }

    assert_eq!(setup.store.session_count(), 1);
    assert!(snapshots.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(setup.game_manager.locked_players(), 0);
}

#[tokio::test]
async fn test_failed_cleanup_does_not_record_game_twice() {
    let store = Arc::new(InMemoryStore::new());
    store.add_word("sol");
    store.add_word("gato");
    let player = store.add_player("Ana");

    let sessions = Arc::new(UnreliableSessionStore::new(store.clone()));
    let game_manager = GameManager::new(store.clone(), store.clone(), sessions.clone(), store.clone());

    game_manager.start_game(player.id).await.unwrap();
    game_manager.make_guess(player.id, 'S').await.unwrap();
    game_manager.make_guess(player.id, 'O').await.unwrap();

    sessions.fail_next_delete();
    let err = game_manager.make_guess(player.id, 'L').await.unwrap_err();
    assert!(matches!(err, ServiceError::Storage(_)));
    assert_eq!(GameLedger::find_all(store.as_ref()).await.unwrap().len(), 1);
    assert_eq!(store.session_count(), 1);

    // The finished session is cleaned up before the next game starts
    let snapshot = game_manager.start_game(player.id).await.unwrap();
    assert_eq!(snapshot.hidden_word, "____");

    let games = GameLedger::find_all(store.as_ref()).await.unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].word, "SOL");
    assert_eq!(games[0].result, GameResult::Won);
    assert_eq!(games[0].score, 20);
}

#[tokio::test]
async fn test_failed_cleanup_retried_by_next_guess() {
    let store = Arc::new(InMemoryStore::new());
    store.add_word("sol");
    let player = store.add_player("Ana");

    let sessions = Arc::new(UnreliableSessionStore::new(store.clone()));
    let game_manager = GameManager::new(store.clone(), store.clone(), sessions.clone(), store.clone());

    game_manager.start_game(player.id).await.unwrap();
    for letter in ['X', 'Q', 'Z', 'W', 'J', 'K'] {
        game_manager.make_guess(player.id, letter).await.unwrap();
    }

    sessions.fail_next_delete();
    assert!(game_manager.make_guess(player.id, 'V').await.is_err());

    let snapshot = game_manager.make_guess(player.id, 'S').await.unwrap();
    assert_eq!(snapshot.remaining_attempts, 0);
    assert_eq!(snapshot.score, 0);
    assert_eq!(store.session_count(), 0);
    assert_eq!(GameLedger::find_all(store.as_ref()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_lock_entries_are_released() {
    let setup = TestGameServerSetup::with_words(&["sol"]);
    let player = setup.create_player("Juan");

    for _ in 0..10 {
        assert!(setup.game_manager.start_game(Uuid::new_v4()).await.is_err());
        assert!(setup.game_manager.make_guess(Uuid::new_v4(), 'A').await.is_err());
    }
    assert_eq!(setup.game_manager.locked_players(), 0);

    setup.game_manager.start_game(player.id).await.unwrap();
    setup.play(&player, "SOL").await;
    assert_eq!(setup.game_manager.locked_players(), 0);

    // Errors raised while the lock is held release it too
    let err = setup.game_manager.make_guess(player.id, 'A').await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Game(GameError::NoActiveSession { .. })
    ));
    assert_eq!(setup.game_manager.locked_players(), 0);
}
