use hangman_core::VersionConflict;
use hangman_types::GameError;
use warp::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("Storage failure: {0:#}")]
    Storage(anyhow::Error),
}

impl From<anyhow::Error> for ServiceError {
    fn from(err: anyhow::Error) -> Self {
        let err = match err.downcast::<GameError>() {
            Ok(game_error) => return ServiceError::Game(game_error),
            Err(err) => err,
        };

        match err.downcast::<VersionConflict>() {
            Ok(conflict) => ServiceError::Game(GameError::SessionConflict {
                player_id: conflict.player_id,
            }),
            Err(err) => ServiceError::Storage(err),
        }
    }
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Game(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            ServiceError::Game(GameError::SessionConflict { .. }) => StatusCode::CONFLICT,
            ServiceError::Game(_) => StatusCode::BAD_REQUEST,
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand to clients
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::Game(err) => err.to_string(),
            ServiceError::Storage(_) => "Internal server error".to_string(),
        }
    }
}
