//! # TerraVision CLI Module
//!
//! This module implements the CLI interface for TerraVision.
//!
//! ## Available Commands
//!
//! - `status` - Show the stored passport and journey
//! - `issue` - Issue a passport from name and date of birth
//! - `prelude` - Read the story prelude and enter the journey
//! - `journey` - Inspect or act on the journey (one action per call)
//! - `ambient` - Switch the ambient soundscape preference

mod commands;

use crate::config::AppConfig;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use terravision_core::TerraError;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// TerraVision Gateway 2050
///
/// Issue a passport, pass through the launch sequence, and journey through
/// seven stages to the year 2050.
#[derive(Parser, Debug)]
#[command(name = "terravision")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner and typed transition output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the config file (default: terravision.toml, optional)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the snapshot database (overrides [storage] path)
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Complete every timed step immediately
    #[arg(long, global = true)]
    pub instant: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the stored passport and journey progress
    Status,

    /// Issue a passport and run the passport sequence
    Issue {
        /// Traveler name
        #[arg(short, long)]
        name: String,

        /// Date of birth, YYYY-MM-DD
        #[arg(short, long)]
        dob: String,
    },

    /// Open the story prelude and continue into the journey
    Prelude,

    /// Act on the journey
    Journey {
        #[command(subcommand)]
        action: Option<JourneyAction>,
    },

    /// Switch the ambient soundscape preference
    Ambient {
        #[arg(value_enum)]
        state: Switch,
    },
}

/// One journey operation.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum JourneyAction {
    /// Show the current stage
    Show,
    /// Dismiss the intro narrative
    Begin,
    /// Choose a launch seat (A1, B4, C2, D5)
    Seat { id: String },
    /// Start the launch countdown
    Launch,
    /// Choose the AI companion focus (eco, stellar, synthetic)
    Focus { id: String },
    /// Choose a colony habitat (dome, ring, arcology)
    Habitat { id: String },
    /// Toggle a puzzle node (1-3)
    Node { number: usize },
    /// Choose a crisis response
    Crisis { id: String },
    /// Choose a timeline (2125, 2200, 2300)
    Timeline { id: String },
    /// Confirm the current stage and move on
    Confirm,
    /// Step back one stage
    Back,
    /// Start over from the launch
    Restart,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    On,
    Off,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli, config: AppConfig) -> Result<(), TerraError> {
    let opts = RunOptions {
        database: cli.database.unwrap_or_else(|| config.storage.path.clone()),
        instant: cli.instant,
        json_mode: cli.json_mode,
        quiet: cli.quiet,
    };

    match cli.command {
        Some(Commands::Status) | None => cmd_status(&opts, &config),
        Some(Commands::Issue { name, dob }) => cmd_issue(&opts, &config, &name, &dob).await,
        Some(Commands::Prelude) => cmd_prelude(&opts, &config).await,
        Some(Commands::Journey { action }) => {
            cmd_journey(&opts, &config, action.unwrap_or(JourneyAction::Show)).await
        }
        Some(Commands::Ambient { state }) => cmd_ambient(&opts, &config, state == Switch::On),
    }
}
