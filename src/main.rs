//! Bookclub Server - membership app for a private book club

use std::{net::SocketAddr, str::FromStr, sync::Arc};

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookclub_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::{
        metadata::{DisabledMetadata, MetadataProvider, OpenLibraryClient},
        Services,
    },
    AppState, MIGRATOR,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("bookclub_server={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Bookclub Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let connect_options = SqliteConnectOptions::from_str(&config.database.url)
        .context("Invalid database URL")?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect_with(connect_options)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    MIGRATOR
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    let metadata: Arc<dyn MetadataProvider> = if config.metadata.enabled {
        Arc::new(OpenLibraryClient::new(&config.metadata).context("Failed to build metadata client")?)
    } else {
        tracing::info!("Book metadata lookups disabled");
        Arc::new(DisabledMetadata)
    };

    let repository = Repository::new(pool);
    let services = Services::new(repository, &config, metadata);

    if let Some(admin) = services
        .users
        .ensure_admin(&config.admin)
        .await
        .context("Failed to create bootstrap administrator")?
    {
        tracing::warn!(email = %admin.email, "Created default administrator; change its password");
    }

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = api::create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
