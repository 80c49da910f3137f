//! ledger-web: JSON API service driving the ledger engine against an
//! in-process store.

use std::net::SocketAddr;

use clap::Parser;

use ledger_web::config::Config;
use ledger_web::state::AppState;

/// JSON API service for the ledger engine.
#[derive(Parser, Debug)]
#[command(name = "ledger-web")]
#[command(about = "JSON API service for the ledger engine", long_about = None)]
struct Args {
    /// Address to bind the web server.
    #[arg(long, default_value = "127.0.0.1:8080")]
    address: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .init();

    let address: SocketAddr = args.address.parse()?;
    let config = Config { address };
    let state = AppState::new(config);
    let app = ledger_web::build_router(state);

    let listener = tokio::net::TcpListener::bind(address).await?;
    tracing::info!("ledger-web listening on http://{}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
