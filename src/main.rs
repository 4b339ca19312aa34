//! Research Catalogue search proxy.
//!
//! ```text
//!   Client ── GET /proxy?keyword=..&portal=.. ──▶ rc-proxy
//!                                                   │ render template
//!                                                   ▼
//!                            www.researchcatalogue.net/portal/search-result
//!                                                   │ body stream
//!   Client ◀──────────── 200 + upstream bytes ──────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use rc_proxy::http::HttpServer;
use rc_proxy::lifecycle::{bind_listener, resolve_config, wait_for_signal, Shutdown};
use rc_proxy::observability::init_logging;

#[derive(Parser)]
#[command(name = "rc-proxy")]
#[command(about = "Forwards /proxy searches to the Research Catalogue", long_about = None)]
struct Cli {
    /// Optional TOML config file; built-in defaults otherwise.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen address (e.g. 127.0.0.1:3000).
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_deref(), cli.bind)?;

    init_logging(&config.observability);
    tracing::info!("rc-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    let server = HttpServer::new(config)?;
    let listener = bind_listener(server.config()).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
