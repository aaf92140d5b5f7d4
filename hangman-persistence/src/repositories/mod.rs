pub mod game_repository;
pub mod player_repository;
pub mod session_repository;
pub mod word_repository;

pub use game_repository::GameRepository;
pub use player_repository::PlayerRepository;
pub use session_repository::SessionRepository;
pub use word_repository::WordRepository;

#[cfg(test)]
pub(crate) mod test_support {
    use sea_orm::DatabaseConnection;

    use crate::connection::connect_to_migrated_memory_database;

    pub async fn setup_test_db() -> DatabaseConnection {
        connect_to_migrated_memory_database().await.unwrap()
    }
}
