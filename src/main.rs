use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use demandview::{api, client::ApiClient, store::Catalog, webapp::DemandPage};

#[derive(Parser)]
#[command(name = "demandview")]
#[command(about = "Web viewer and API for exported input-output model data")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the model API and the demand page
    Serve {
        /// Data folder with one sub-folder per model
        #[arg(short, long, default_value = "data")]
        data: PathBuf,

        /// Port for HTTP API
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
    /// Fetch sector data from a running server and print the demand page
    Page {
        /// Base URL of the server
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
    /// Re-fetch the sector data and log the raw response
    Recalc {
        /// Base URL of the server
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,

        /// Number of fetches to issue
        #[arg(short, long, default_value = "1")]
        count: u32,
    },
}

/// Initialize tracing with output to stderr (for page mode) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "demandview=debug,tower_http=debug".into()),
    );

    if use_stderr {
        // Page mode: log to stderr so stdout is clean for the document
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Page mode prints the document on stdout, keep logging off it
    let use_stderr = matches!(cli.command, Some(Commands::Page { .. }));
    init_tracing(use_stderr);

    match cli.command {
        Some(Commands::Serve { data, port }) => serve(data, port).await?,
        Some(Commands::Page { url }) => {
            let mut page = DemandPage::new(ApiClient::new(url));
            page.on_ready().await;
            println!("{}", page.html());
        }
        Some(Commands::Recalc { url, count }) => {
            let page = DemandPage::new(ApiClient::new(url));
            for _ in 0..count {
                page.on_recalculate().await;
            }
        }
        None => {
            // Default: serve ./data on the standard port
            serve(PathBuf::from("data"), 8080).await?;
        }
    }

    Ok(())
}

async fn serve(data: PathBuf, port: u16) -> anyhow::Result<()> {
    let catalog = Catalog::open(&data)?;
    tracing::info!("Loaded {} model(s) from {}", catalog.len(), data.display());

    let app = api::create_router(Arc::new(catalog));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!("demandview listening on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}
