use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use patch_baselines::config;
use patch_baselines::database::{DatabaseManager, PgStore};
use patch_baselines::router::app;
use patch_baselines::state::{AppState, Resources};

#[derive(Parser, Debug)]
#[command(name = "patch-baselines", about = "Patch baseline management API")]
struct Args {
    /// Port to listen on (overrides API_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind (overrides API_BIND)
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, API_PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = config::config();
    tracing::info!("Starting patch baselines API in {:?} mode", config.environment);

    // Malformed resource declarations stop the service here, not per request
    let resources = Resources::build()?;

    let pool = DatabaseManager::connect_lazy(&config.database)?;
    let store = Arc::new(PgStore::new(pool));
    let app = app(AppState::new(store, resources));

    let port = args.port.unwrap_or(config.api.port);
    let bind = args.bind.unwrap_or_else(|| config.api.bind.clone());
    let bind_addr = format!("{}:{}", bind, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
