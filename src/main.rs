use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use citescout::client::OpenAlexClient;
use citescout::config::Config;
use citescout::export::export_to_csv;

/// Retrieve top cited papers from OpenAlex and export them to CSV
#[derive(Parser, Debug)]
#[command(name = "citescout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Retrieve top cited papers from OpenAlex", long_about = None)]
struct Cli {
    /// Search term to find relevant papers
    search_term: String,

    /// Maximum number of papers to retrieve
    #[arg(long, default_value_t = 10)]
    limit: usize,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "citescout=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::default();
    let client = OpenAlexClient::new(&config)?;

    tracing::info!(term = %cli.search_term, "fetching papers");
    let papers = client.top_cited(&cli.search_term, cli.limit, None).await?;

    let output = export_to_csv(&papers, &cli.search_term)?;
    tracing::info!(
        count = papers.len(),
        output = %output.display(),
        "successfully exported papers"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    if let Err(err) = run(cli).await {
        tracing::error!(error = %err, "citescout failed");
        return Err(err);
    }
    Ok(())
}
