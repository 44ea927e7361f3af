use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use invictus_docs_mcp::config::Config;
use invictus_docs_mcp::index::{DocIndex, IndexError};
use invictus_docs_mcp::mcp::server::{McpContext, McpServer};

/// MCP server for the Invictus for Azure documentation.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Path to the JSON configuration file
    #[arg(short, long, default_value = "config.json")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // All logging goes to stderr; stdout carries the MCP wire format.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    info!("Starting Invictus docs MCP server...");

    // 1. Load config
    let config = Config::load(&args.config)?;
    config.validate()?;
    let config = Arc::new(config);

    // 2. Build the documentation index
    let index = Arc::new(DocIndex::new());
    match index.initialize(&config) {
        Ok(count) => info!("Documentation index ready ({count} pages)"),
        Err(e @ IndexError::RootNotFound { .. }) if !config.require_docs => {
            warn!("{e}; starting with an empty index");
        }
        Err(e) => return Err(e.into()),
    }

    // 3. Start server
    let ctx = McpContext { index, config };
    McpServer::new(ctx).start().await
}
