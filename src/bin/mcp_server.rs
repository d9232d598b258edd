//! Reagent MCP server
//!
//! Serves the calculator and unit converter over newline-delimited JSON-RPC
//! on stdin/stdout. Logs go to stderr so they never corrupt the protocol
//! stream.

use reagent::mcp::McpServer;
use reagent::Result;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("reagent=info".parse().unwrap()),
        )
        .init();

    McpServer::new().run().await
}
