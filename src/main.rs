use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use starwars_api::{config, database, router, state::AppState};

#[derive(Debug, Parser)]
#[command(name = "starwars-api", version, about = "Star Wars catalog REST API")]
struct Args {
    /// Port to listen on (overrides API_PORT / PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// SQLite connection string (overrides DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("starwars_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = config::config().clone();
    if let Some(port) = args.port {
        config.api.port = port;
    }
    if let Some(url) = args.database_url {
        config.database.url = url;
    }
    config.validate().context("invalid configuration")?;
    info!("Starting Star Wars API in {:?} mode", config.environment);

    let pool = database::connect(&config.database)
        .await
        .with_context(|| format!("failed to connect to {}", config.database.url))?;
    database::ensure_schema(&pool).await.context("failed to bootstrap schema")?;
    info!("Database ready at {}", config.database.url);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Listening on http://{}", listener.local_addr()?);

    let app = router::app(AppState::new(pool, config));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
