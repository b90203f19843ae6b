use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use clientdesk_core::config::AppConfig;
use clientdesk_server::pipeline::ClientPipeline;
use clientdesk_server::routes::create_router;
use clientdesk_server::state::AppState;
use clientdesk_store::{PgStore, RecordStore};

#[derive(Parser, Debug)]
#[command(name = "clientdesk-server", about = "Ownership-scoped client record API")]
struct Args {
    /// Path to the YAML configuration file.
    #[arg(long, default_value = "clientdesk.yaml")]
    config: PathBuf,

    /// Override the Postgres connection string.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Override the listen address.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = AppConfig::load_or_default(&args.config)
        .with_context(|| format!("loading config from {}", args.config.display()))?;
    if let Some(url) = args.database_url {
        config.database.url = url;
    }
    if let Some(bind) = args.bind {
        config.http.bind_addr = bind;
    }

    let store = PgStore::connect(&config.database)
        .await
        .context("connecting to database")?;
    let store: Arc<dyn RecordStore> = Arc::new(store);

    let dispatcher = clientdesk_notify::dispatcher_from_config(&config.notifier)?;
    let mailer = clientdesk_notify::mailer_from_config(&config.mail)?;
    let pipeline = ClientPipeline::new(Arc::clone(&store), dispatcher, mailer);
    let state = AppState::new(store, pipeline);

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(&config.http.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.http.bind_addr))?;
    tracing::info!(addr = %config.http.bind_addr, "clientdesk-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install shutdown handler");
        return;
    }
    tracing::info!("shutdown signal received");
}
