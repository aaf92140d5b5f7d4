use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use hangman_core::WordList;
use hangman_persistence::connection::connect_and_migrate;
use hangman_persistence::repositories::{
    GameRepository, PlayerRepository, SessionRepository, WordRepository,
};
use hangman_server::{config::Config, create_routes, game_manager::GameManager};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting hangman server...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize database connection and run migrations
    let db = match connect_and_migrate(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database and run migrations: {}", e);
            std::process::exit(1);
        }
    };

    let player_repository = Arc::new(PlayerRepository::new(db.clone()));
    let word_repository = Arc::new(WordRepository::new(db.clone()));

    if let Err(e) = seed_words(&config, &word_repository).await {
        error!("Failed to seed the word catalog: {:#}", e);
        std::process::exit(1);
    }

    let game_manager = Arc::new(GameManager::new(
        player_repository.clone(),
        word_repository.clone(),
        Arc::new(SessionRepository::new(db.clone())),
        Arc::new(GameRepository::new(db)),
    ));

    let routes = create_routes(game_manager, player_repository, word_repository);

    info!("Server starting on {}:{}", config.host, config.port);

    let (addr, server) =
        warp::serve(routes).bind_with_graceful_shutdown((config.host, config.port), async {
            // Wait for SIGINT (Ctrl+C) or SIGTERM
            #[cfg(unix)]
            {
                let (Ok(mut sigint), Ok(mut sigterm)) = (
                    signal::unix::signal(signal::unix::SignalKind::interrupt()),
                    signal::unix::signal(signal::unix::SignalKind::terminate()),
                ) else {
                    error!("Failed to install signal handlers");
                    return std::future::pending().await;
                };

                tokio::select! {
                    _ = sigint.recv() => {
                        info!("Received SIGINT, shutting down gracefully...");
                    }
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM, shutting down gracefully...");
                    }
                }
            }

            #[cfg(not(unix))]
            {
                if let Err(e) = signal::ctrl_c().await {
                    error!("Failed to listen for ctrl+c: {}", e);
                    return std::future::pending().await;
                }
                info!("Received Ctrl+C, shutting down gracefully...");
            }
        });

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
}

/// Load the configured word list, or the built-in one when the catalog is
/// still empty
async fn seed_words(config: &Config, word_repository: &WordRepository) -> anyhow::Result<()> {
    let word_list = match &config.words_file {
        Some(path) => {
            info!("Loading words from {}", path.display());
            WordList::from_file(path)?
        }
        None if word_repository.count().await? == 0 => {
            info!("Word catalog is empty, loading the built-in word list");
            WordList::builtin()
        }
        None => return Ok(()),
    };

    word_repository.seed(&word_list).await?;
    info!(
        "Word catalog has {} unused words",
        word_repository.count_unused().await?
    );
    Ok(())
}
