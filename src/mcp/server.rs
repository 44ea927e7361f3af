/// MCP server setup using `rmcp` with stdio transport.
///
/// Provides `McpContext` (shared state) and `McpServer` (startup logic).
use anyhow::{Context, Result};
use rmcp::{ServiceExt, transport::io::stdio};
use std::sync::Arc;

use crate::config::Config;
use crate::index::DocIndex;
use crate::mcp::tools::DocsTools;

/// Shared application context available to all handlers.
#[derive(Clone)]
pub struct McpContext {
    pub index: Arc<DocIndex>,
    pub config: Arc<Config>,
}

/// MCP server wrapping the context and serving via stdio.
#[derive(Clone)]
pub struct McpServer {
    pub ctx: McpContext,
}

impl McpServer {
    pub fn new(ctx: McpContext) -> Self {
        Self { ctx }
    }

    /// Start the MCP server on stdio transport (blocks until the client
    /// disconnects).
    pub async fn start(self) -> Result<()> {
        tracing::info!("Starting MCP server on stdio...");
        let (stdin, stdout) = stdio();

        let tools = DocsTools::new(self.ctx);
        let running = tools
            .serve((stdin, stdout))
            .await
            .context("MCP server failed to initialize on stdio transport")?;

        running
            .waiting()
            .await
            .context("MCP server encountered an error during stdio transport")?;

        Ok(())
    }
}
