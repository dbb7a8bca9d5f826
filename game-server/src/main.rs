use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use game_persistence::{GameRepository, SeaOrmKvStore, connection::connect_and_migrate};
use game_server::{
    commentary::{CannedCommentator, Commentator},
    config::Config,
    create_routes,
    dictionary::{DictionaryValidator, HttpDictionaryOracle},
    game_manager::GameManager,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Mess It Up server...");

    let config = Config::new();

    // Initialize database connection and run migrations
    let db = match connect_and_migrate(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to connect to database and run migrations: {}", e);
            std::process::exit(1);
        }
    };
    let repository = GameRepository::new(Arc::new(SeaOrmKvStore::new(db)));

    info!("Using dictionary service at {}", config.dictionary_api_url);
    let dictionary = Arc::new(DictionaryValidator::new(
        Arc::new(HttpDictionaryOracle::new(config.dictionary_api_url.clone())),
        repository.clone(),
        Duration::from_secs(config.dictionary_timeout_seconds),
    ));

    let commentator: Option<Arc<dyn Commentator>> = if config.ai_commentary_enabled {
        Some(Arc::new(CannedCommentator))
    } else {
        info!("Commentary disabled");
        None
    };

    let game_manager = Arc::new(GameManager::new(
        repository,
        dictionary,
        commentator,
        &config,
    ));
    let routes = create_routes(game_manager);

    info!("Server starting on {}:{}", config.host, config.port);

    let ip = match config.host.parse::<std::net::IpAddr>() {
        Ok(ip) => ip,
        Err(e) => {
            tracing::error!("Invalid HOST '{}': {}", config.host, e);
            std::process::exit(1);
        }
    };

    let (addr, server) = warp::serve(routes).bind_with_graceful_shutdown((ip, config.port), async {
        // Wait for SIGINT (Ctrl+C) or SIGTERM
        #[cfg(unix)]
        {
            let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())
                .expect("Failed to install SIGINT handler");
            let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM handler");

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
            signal::ctrl_c().await.expect("Failed to listen for ctrl+c");
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
