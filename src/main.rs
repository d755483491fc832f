//! Gateway binary entrypoint.

use std::process;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use portcullis::adapters::mongo::{MongoPostsRepository, MongoUsersRepository};
use portcullis::adapters::{
    build_client, build_session_layer, gateway_router, spawn_monitor, AppState, RedisSessionStore,
    RetryPolicy,
};
use portcullis::config::{AppConfig, ConfigError, ValidationError};
use portcullis::telemetry::{self, TelemetryError};

#[derive(Debug, Error)]
enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Configuration validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("Document store client error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Cache client error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Fatal: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = AppConfig::load()?;
    config.validate()?;
    telemetry::init(&config.server)?;

    info!(
        environment = ?config.server.environment,
        "Starting portcullis gateway"
    );

    // The client is lazy; the monitor owns reconnection and readiness.
    let client = build_client(&config.database).await?;
    let (db_health, _monitor) = spawn_monitor(client.clone(), RetryPolicy::from(&config.database));

    let redis_client = redis::Client::open(config.redis.connection_url())?;
    let store = RedisSessionStore::new(redis_client, config.redis.connect_timeout());
    match store.connect().await {
        Ok(()) => info!("Connected to session cache"),
        Err(err) => warn!(
            error = %err,
            "Session cache unavailable at startup, sessions degrade until it returns"
        ),
    }
    let session_layer = build_session_layer(store, &config.session);

    let db = client.database(&config.database.database);
    let posts = Arc::new(MongoPostsRepository::new(&db));
    let users = Arc::new(MongoUsersRepository::new(&db));

    // The unique username index can only be created once the store answers.
    {
        let mut health = db_health.clone();
        let users = users.clone();
        tokio::spawn(async move {
            if health.wait_ready().await {
                if let Err(err) = users.ensure_indexes().await {
                    warn!(error = %err, "Could not create username index");
                }
            }
        });
    }

    let state = AppState::new(posts, users, db_health);
    let router = gateway_router(state, session_layer, &config);

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Gateway listening");
    axum::serve(listener, router.into_make_service()).await?;

    Ok(())
}
