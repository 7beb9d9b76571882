use anyhow::Result;
use clap::Parser;
use symquery_server::routes::{app, AppConfig};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// HTTP front end for free-form math queries.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Per-query time budget in seconds.
    #[arg(long, default_value_t = 10)]
    budget_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig {
        budget: Duration::from_secs(args.budget_secs),
    };

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    info!("listening on http://{}", args.bind);
    axum::serve(listener, app(config)).await?;
    Ok(())
}
