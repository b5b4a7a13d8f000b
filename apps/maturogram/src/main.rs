//! # Maturogram
//!
//! Server and CLI for the Human Maturogram scorer.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │               apps/maturogram (THE BINARY)           │
//! │                                                      │
//! │   ┌─────────────┐              ┌─────────────┐       │
//! │   │    CLI      │              │  HTTP API   │       │
//! │   │   (clap)    │              │   (axum)    │       │
//! │   └──────┬──────┘              └──────┬──────┘       │
//! │          └──────────────┬─────────────┘              │
//! │                         ▼                            │
//! │               ┌───────────────────┐                  │
//! │               │  maturogram-core  │                  │
//! │               │   (THE SCORER)    │                  │
//! │               └───────────────────┘                  │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! maturogram server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! maturogram score --age 30 --totals 0,0,0,0,0,6,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0
//! maturogram submit --age 30 --responses answers.json
//! maturogram list --order-by percentage --desc
//! ```

use clap::Parser;
use maturogram::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // MATUROGRAM_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("MATUROGRAM_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "maturogram=info,maturogram_core=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
  Human Maturogram v{}

  Observed vs Predicted Maturity
"#,
        env!("CARGO_PKG_VERSION")
    );
}
