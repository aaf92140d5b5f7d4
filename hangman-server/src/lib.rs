use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;
use warp::Filter;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::Reply;
use warp::hyper::body::Bytes;

use crate::error::ServiceError;
use crate::game_manager::GameManager;
use hangman_persistence::repositories::{PlayerRepository, WordRepository};
use hangman_types::{GameError, GuessRequest, PlayerInput};

pub mod config;
pub mod error;
pub mod game_manager;

const MAX_BODY_BYTES: u64 = 4 * 1024;

pub fn create_routes(
    game_manager: Arc<GameManager>,
    player_repository: Arc<PlayerRepository>,
    word_repository: Arc<WordRepository>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    // Clone for filters
    let game_manager_filter = warp::any().map({
        let game_manager = game_manager.clone();
        move || game_manager.clone()
    });

    let player_repository_filter = warp::any().map({
        let player_repository = player_repository.clone();
        move || player_repository.clone()
    });

    let word_repository_filter = warp::any().map({
        let word_repository = word_repository.clone();
        move || word_repository.clone()
    });

    let json_body = warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::bytes());

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    // Games
    let start_game = warp::path!("api" / "games" / "start" / String)
        .and(warp::post())
        .and(game_manager_filter.clone())
        .and_then(handle_start_game);

    let guess = warp::path!("api" / "games" / "guess")
        .and(warp::post())
        .and(json_body.clone())
        .and(game_manager_filter.clone())
        .and_then(handle_guess);

    let all_games = warp::path!("api" / "games")
        .and(warp::get())
        .and(game_manager_filter.clone())
        .and_then(handle_list_games);

    let player_games = warp::path!("api" / "games" / "player" / String)
        .and(warp::get())
        .and(game_manager_filter.clone())
        .and_then(handle_player_games);

    // Players
    let list_players = warp::path!("api" / "players")
        .and(warp::get())
        .and(player_repository_filter.clone())
        .and_then(handle_list_players);

    let get_player = warp::path!("api" / "players" / String)
        .and(warp::get())
        .and(player_repository_filter.clone())
        .and_then(handle_get_player);

    let create_player = warp::path!("api" / "players")
        .and(warp::post())
        .and(json_body.clone())
        .and(player_repository_filter.clone())
        .and_then(handle_create_player);

    let update_player = warp::path!("api" / "players" / String)
        .and(warp::put())
        .and(json_body)
        .and(player_repository_filter.clone())
        .and_then(handle_update_player);

    let delete_player = warp::path!("api" / "players" / String)
        .and(warp::delete())
        .and(player_repository_filter.clone())
        .and_then(handle_delete_player);

    // Words
    let list_words = warp::path!("api" / "words")
        .and(warp::get())
        .and(word_repository_filter)
        .and_then(handle_list_words);

    // Scoreboard
    let scoreboard = warp::path!("api" / "scoreboard")
        .and(warp::get())
        .and(game_manager_filter.clone())
        .and(player_repository_filter)
        .and_then(handle_scoreboard);

    let player_scoreboard = warp::path!("api" / "scoreboard" / "player" / String)
        .and(warp::get())
        .and(game_manager_filter)
        .and_then(handle_player_scoreboard);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE"]);

    health
        .or(start_game)
        .or(guess)
        .or(all_games)
        .or(player_games)
        .or(list_players)
        .or(get_player)
        .or(create_player)
        .or(update_player)
        .or(delete_player)
        .or(list_words)
        .or(scoreboard)
        .or(player_scoreboard)
        .with(cors)
        .with(warp::log("hangman"))
}

fn json_reply<T: Serialize>(value: &T, status: StatusCode) -> Response {
    warp::reply::with_status(warp::reply::json(value), status).into_response()
}

fn error_reply(message: &str, status: StatusCode) -> Response {
    json_reply(&serde_json::json!({ "error": message }), status)
}

fn service_error_reply(err: ServiceError) -> Response {
    if let ServiceError::Storage(cause) = &err {
        tracing::error!("Request failed: {:#}", cause);
    }
    error_reply(&err.public_message(), err.status())
}

fn parse_id(id: &str, kind: &str) -> Result<Uuid, Response> {
    Uuid::parse_str(id)
        .map_err(|_| error_reply(&format!("Invalid {} ID format", kind), StatusCode::BAD_REQUEST))
}

fn parse_body<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, Response> {
    serde_json::from_slice(body).map_err(|err| {
        error_reply(
            &format!("Invalid request body: {}", err),
            StatusCode::BAD_REQUEST,
        )
    })
}

/// A guess must be exactly one alphabetic character
fn parse_letter(letter: &str) -> Result<char, GameError> {
    let mut chars = letter.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_alphabetic() => Ok(c),
        _ => Err(GameError::InvalidLetter {
            letter: letter.to_string(),
        }),
    }
}

async fn handle_start_game(
    player_id: String,
    game_manager: Arc<GameManager>,
) -> Result<Response, warp::Rejection> {
    let player_id = match parse_id(&player_id, "player") {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    match game_manager.start_game(player_id).await {
        Ok(snapshot) => Ok(json_reply(&snapshot, StatusCode::OK)),
        Err(err) => Ok(service_error_reply(err)),
    }
}

async fn handle_guess(
    body: Bytes,
    game_manager: Arc<GameManager>,
) -> Result<Response, warp::Rejection> {
    let request: GuessRequest = match parse_body(&body) {
        Ok(request) => request,
        Err(reply) => return Ok(reply),
    };

    let letter = match parse_letter(&request.letter) {
        Ok(letter) => letter,
        Err(err) => return Ok(service_error_reply(err.into())),
    };

    match game_manager.make_guess(request.player_id, letter).await {
        Ok(snapshot) => Ok(json_reply(&snapshot, StatusCode::OK)),
        Err(err) => Ok(service_error_reply(err)),
    }
}

async fn handle_list_games(game_manager: Arc<GameManager>) -> Result<Response, warp::Rejection> {
    match game_manager.list_all_games().await {
        Ok(games) => Ok(json_reply(&games, StatusCode::OK)),
        Err(err) => Ok(service_error_reply(err)),
    }
}

async fn handle_player_games(
    player_id: String,
    game_manager: Arc<GameManager>,
) -> Result<Response, warp::Rejection> {
    let player_id = match parse_id(&player_id, "player") {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    match game_manager.list_games_by_player(player_id).await {
        Ok(games) => Ok(json_reply(&games, StatusCode::OK)),
        Err(err) => Ok(service_error_reply(err)),
    }
}

async fn handle_list_players(
    player_repository: Arc<PlayerRepository>,
) -> Result<Response, warp::Rejection> {
    match player_repository.find_all().await {
        Ok(players) => Ok(json_reply(&players, StatusCode::OK)),
        Err(err) => Ok(service_error_reply(err.into())),
    }
}

async fn handle_get_player(
    player_id: String,
    player_repository: Arc<PlayerRepository>,
) -> Result<Response, warp::Rejection> {
    let player_id = match parse_id(&player_id, "player") {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    match player_repository.find_player(player_id).await {
        Ok(Some(player)) => Ok(json_reply(&player, StatusCode::OK)),
        Ok(None) => Ok(service_error_reply(
            GameError::PlayerNotFound { player_id }.into(),
        )),
        Err(err) => Ok(service_error_reply(err.into())),
    }
}

async fn handle_create_player(
    body: Bytes,
    player_repository: Arc<PlayerRepository>,
) -> Result<Response, warp::Rejection> {
    let input: PlayerInput = match parse_body(&body) {
        Ok(input) => input,
        Err(reply) => return Ok(reply),
    };

    match player_repository.create_player(&input.name).await {
        Ok(player) => Ok(json_reply(&player, StatusCode::CREATED)),
        Err(err) => Ok(service_error_reply(err.into())),
    }
}

async fn handle_update_player(
    player_id: String,
    body: Bytes,
    player_repository: Arc<PlayerRepository>,
) -> Result<Response, warp::Rejection> {
    let player_id = match parse_id(&player_id, "player") {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };
    let input: PlayerInput = match parse_body(&body) {
        Ok(input) => input,
        Err(reply) => return Ok(reply),
    };

    match player_repository.update_player(player_id, &input.name).await {
        Ok(Some(player)) => Ok(json_reply(&player, StatusCode::OK)),
        Ok(None) => Ok(service_error_reply(
            GameError::PlayerNotFound { player_id }.into(),
        )),
        Err(err) => Ok(service_error_reply(err.into())),
    }
}

async fn handle_delete_player(
    player_id: String,
    player_repository: Arc<PlayerRepository>,
) -> Result<Response, warp::Rejection> {
    let player_id = match parse_id(&player_id, "player") {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    match player_repository.delete_player(player_id).await {
        Ok(true) => Ok(StatusCode::NO_CONTENT.into_response()),
        Ok(false) => Ok(service_error_reply(
            GameError::PlayerNotFound { player_id }.into(),
        )),
        Err(err) => Ok(service_error_reply(err.into())),
    }
}

async fn handle_list_words(
    word_repository: Arc<WordRepository>,
) -> Result<Response, warp::Rejection> {
    match word_repository.find_all().await {
        Ok(words) => Ok(json_reply(&words, StatusCode::OK)),
        Err(err) => Ok(service_error_reply(err.into())),
    }
}

async fn handle_scoreboard(
    game_manager: Arc<GameManager>,
    player_repository: Arc<PlayerRepository>,
) -> Result<Response, warp::Rejection> {
    let players = match player_repository.find_all().await {
        Ok(players) => players,
        Err(err) => return Ok(service_error_reply(err.into())),
    };

    match game_manager.scoreboard(&players).await {
        Ok(scoreboard) => Ok(json_reply(&scoreboard, StatusCode::OK)),
        Err(err) => Ok(service_error_reply(err)),
    }
}

async fn handle_player_scoreboard(
    player_id: String,
    game_manager: Arc<GameManager>,
) -> Result<Response, warp::Rejection> {
    let player_id = match parse_id(&player_id, "player") {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };

    match game_manager.scoreboard_for_player(player_id).await {
        Ok(entry) => Ok(json_reply(&entry, StatusCode::OK)),
        Err(err) => Ok(service_error_reply(err)),
    }
}
