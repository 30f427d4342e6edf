use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use citescout::client::OpenAlexClient;
use citescout::config::Config;
use citescout::web::{router, AppState};

/// Serve the citescout web form
#[derive(Parser, Debug)]
#[command(name = "citescout-web")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Serve the citescout web form", long_about = None)]
struct Cli {
    /// Port to listen on (overrides CITESCOUT_PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "citescout=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::default();
    let port = cli.port.unwrap_or(config.port);
    let client = Arc::new(OpenAlexClient::new(&config)?);
    let app = router(AppState { client });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
