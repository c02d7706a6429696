//! Serve command: run the MCP server on stdio.

use anyhow::Context;
use clap::Args;
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tracing::{info, instrument};

use crate::server::ProjectServer;

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    // Transport is always stdio; nothing to configure yet.
}

/// Serve MCP requests on stdin/stdout until the client disconnects.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(
    _args: ServeArgs,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    info!(max_input_bytes = ?max_input_bytes, "starting MCP server on stdio");
    let service = ProjectServer::with_max_input_bytes(max_input_bytes)
        .serve(stdio())
        .await
        .context("failed to start MCP server")?;
    let reason = service.waiting().await.context("MCP server failed")?;
    info!(reason = ?reason, "MCP server stopped");
    Ok(())
}
