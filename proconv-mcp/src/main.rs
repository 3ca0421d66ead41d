//! ProConverter MCP Server
//!
//! MCP Server over stdio, one JSON-RPC message per line.
//!
//! Tools:
//! - convert: Convert a value between units of one category
//! - convert_query: Convert from free text like "10 kilograms to grams"
//! - list_categories: List supported categories
//! - list_units: List the units of a category
//! - help: Get documentation for functions

mod config;
mod server;

use std::sync::Arc;

use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};

use config::ServerConfig;
use server::Server;

#[tokio::main]
async fn main() {
    let config = ServerConfig::from_env();

    // stdout carries protocol traffic, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .init();

    info!(
        version = server::SERVER_VERSION,
        protocol = server::PROTOCOL_VERSION,
        decimals = config.decimals,
        "proconv MCP server starting"
    );

    let server = Server::new(Arc::new(proconv_units::standard_registry()), config.decimals);

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "error reading stdin");
                break;
            }
        };

        let Some(response) = server.handle_line(&line) else {
            continue;
        };

        if let Err(e) = write_line(&mut stdout, &response).await {
            error!(error = %e, "error writing response");
            break;
        }
    }

    info!("stdin closed, shutting down");
}

async fn write_line(stdout: &mut io::Stdout, line: &str) -> io::Result<()> {
    stdout.write_all(line.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await
}
