use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf::SearchService;
use shelf_core::config::Config;
use shelf_index::{HttpIndex, MemoryIndex, VectorIndex};

#[derive(Parser)]
#[command(name = "shelf", about = "Faceted catalog search over a vector index")]
struct Cli {
    /// Config file (default: ~/.config/shelf/config.toml, created if missing).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write debug logs to /tmp/shelf-debug.log (tail -f to inspect).
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the product search API.
    Serve {
        /// Listen address (overrides server.listen).
        #[arg(long)]
        listen: Option<String>,

        /// Serve from a JSON catalog file instead of the configured index.
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Print the index request a filter body translates to.
    Translate {
        /// Transport body, e.g. '{"filter":{"sort":"none","color":[],"size":[],"price":[0,100]}}'.
        body: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load().context("loading config")?,
    };

    match cli.command {
        Command::Serve { listen, catalog } => {
            let index: Arc<dyn VectorIndex> = match catalog {
                Some(path) => Arc::new(MemoryIndex::load_catalog(&path)?),
                None => Arc::new(HttpIndex::new(&config.index)?),
            };
            let addr = listen.unwrap_or_else(|| config.server.listen.clone());
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("binding {addr}"))?;
            let service = Arc::new(SearchService::new(&config, index));
            shelf::server::serve(listener, service).await
        }
        Command::Translate { body } => {
            let request = shelf::service::translate_body(&config, &body).context("translating body")?;
            println!("{}", serde_json::to_string_pretty(&request)?);
            Ok(())
        }
    }
}

fn init_tracing(debug: bool) -> anyhow::Result<()> {
    if debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/shelf-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("shelf debug log started, tail -f /tmp/shelf-debug.log");
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(
                        "shelf=info,shelf_core=info,shelf_index=info,tower_http=info",
                    )
                }),
            )
            .init();
    }
    Ok(())
}
