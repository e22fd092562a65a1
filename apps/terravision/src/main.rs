//! # TerraVision Gateway 2050
//!
//! The command-line binary for the TerraVision future journey.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                apps/terravision (THE BINARY)              │
//! │                                                           │
//! │  ┌─────────────┐   ┌──────────────┐   ┌───────────────┐   │
//! │  │   CLI       │   │   Config     │   │   Driver      │   │
//! │  │  (clap)     │   │ (toml+serde) │   │ (tokio time)  │   │
//! │  └──────┬──────┘   └──────┬───────┘   └───────┬───────┘   │
//! │         └─────────────────┼───────────────────┘           │
//! │                           ▼                               │
//! │                 ┌───────────────────┐                     │
//! │                 │ terravision-core  │                     │
//! │                 │   (THE LOGIC)     │                     │
//! │                 └───────────────────┘                     │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! terravision issue --name Ada --dob 1990-05-17
//! terravision prelude
//! terravision journey seat B4
//! terravision journey launch
//! terravision --instant journey confirm
//! terravision status --json-mode
//! ```

use clap::Parser;
use terravision::cli;
use terravision::config::{AppConfig, LogFormat};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = cli::Cli::parse();
    let config = AppConfig::load(cli.config.as_deref());

    // TERRAVISION_LOG_FORMAT wins over the config file.
    let log_format = std::env::var("TERRAVISION_LOG_FORMAT")
        .ok()
        .and_then(|raw| LogFormat::parse(&raw))
        .or_else(|| config.as_ref().ok().map(|c| c.log.format))
        .unwrap_or_default();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "terravision=info,terravision_core=info".into());

    match log_format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli, config).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the TerraVision startup banner.
fn print_banner() {
    println!(
        r#"
  ╔╦╗┌─┐┬─┐┬─┐┌─┐╦  ╦┬┌─┐┬┌─┐┌┐┌
   ║ ├┤ ├┬┘├┬┘├─┤╚╗╔╝│└─┐││ ││││
   ╩ └─┘┴└─┴└─┴ ┴ ╚╝ ┴└─┘┴└─┘┘└┘

  Gateway 2050 v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
