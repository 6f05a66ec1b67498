use std::{process, sync::Arc};

use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

use roadjournal::config::Config;
use roadjournal::db;
use roadjournal::engine::Engine;
use roadjournal::error::Error;
use roadjournal::server::serve;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("roadjournal=info,tower_http=info")),
        )
        .init();

    if let Err(err) = run().await {
        tracing::error!(error = %err, details = ?err.details, "road journal stopped");
        process::exit(1);
    }
}

async fn run() -> Result<(), Error> {
    let config = Arc::new(Config::from_env()?);

    let pool = db::connect(&config.database.url, config.database.max_connections).await?;
    let engine = Engine::new(pool, config.clone()).await?;

    serve(engine, config).await
}
