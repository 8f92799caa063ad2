use alfred::common::config_server::ConfigServer;
use alfred::config::{ConfigDir, ConfigStore};
use anyhow::Result;
use rmcp::transport::stdio;
use rmcp::ServiceExt;
use tracing_subscriber::{self, EnvFilter};

/// Alfred - MCP server for managing a local nix-darwin or home-manager configuration
/// Run with: cargo run --features transport-io
/// Test with: npx @modelcontextprotocol/inspector cargo run --features transport-io
#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Starting Alfred MCP Server");

    let dir = ConfigDir::resolve()?;
    if !dir.exists() {
        tracing::warn!(root = %dir.root().display(), "configuration directory does not exist yet");
    }
    tracing::info!(kind = %dir.kind(), root = %dir.root().display(), "using configuration directory");

    #[cfg(feature = "transport-io")]
    let service = ConfigServer::new(ConfigStore::new(dir))
        .serve(stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("serving error: {:?}", e);
        })?;

    #[cfg(not(feature = "transport-io"))]
    compile_error!("`transport-io` feature is required for this server to run.");

    tracing::info!("Alfred MCP Server is ready and waiting for connections");

    #[cfg(feature = "transport-io")]
    service.waiting().await?;
    Ok(())
}
