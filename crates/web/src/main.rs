use std::sync::Arc;

use anyhow::Context;
use importer::{Credentials, IRacingClient};
use storage::{Database, Stores};

mod app;
mod config;
mod error;
mod features;
mod middleware;
mod state;

use config::Config;
use middleware::auth::ApiKeys;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting league championship API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    let stores = match &config.database_url {
        Some(database_url) => {
            tracing::info!(
                "Connecting to database at: {}",
                database_url.split('@').next_back().unwrap_or("unknown")
            );
            let db = Database::new(database_url)
                .await
                .context("Failed to initialize database")?;
            tracing::info!("Database connection established");

            tracing::info!("Running database migrations");
            db.run_migrations()
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Database migrations completed successfully");

            Stores::postgres(&db)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage");
            Stores::in_memory()
        }
    };

    let credentials = match (&config.iracing_email, &config.iracing_password) {
        (Some(email), Some(password)) => Some(Credentials::new(email, password)),
        _ => {
            tracing::warn!("iRacing credentials not configured, requests will be unauthenticated");
            None
        }
    };
    let client = IRacingClient::new(&config.iracing_base_url, credentials)
        .context("Failed to build iRacing client")?;

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);
    if api_keys.is_empty() {
        tracing::warn!("API_KEYS is empty, every protected endpoint will reject requests");
    }

    let state = AppState::new(stores, Arc::new(client));
    let app = app::router(state, api_keys);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
