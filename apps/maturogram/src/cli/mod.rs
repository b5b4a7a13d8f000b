//! # Maturogram CLI Module
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `score` - Score 24 lustrum totals
//! - `submit` - Score and store a checklist from a JSON file
//! - `list` - List stored records
//! - `show` - Show one record
//! - `delete` - Delete a record
//! - `undo` - Restore the most recently deleted record
//! - `export` - Export all records (CSV or JSON)
//! - `status` - Show archive status
//! - `init` - Initialize a new database
//! - `compact` - Reclaim free space in the database file
//! - `schema` - Print the questionnaire

mod commands;

use crate::config::{AppConfig, Backend};
use clap::{Parser, Subcommand};
use maturogram_core::{AgePolicy, MaturogramError};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Maturogram - Human Maturogram scorer
///
/// Scores a 144-item life-stage checklist against chronological age and
/// keeps the results for review and export.
#[derive(Parser, Debug)]
#[command(name = "maturogram")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the record database (overrides the config file)
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Storage backend: "redb" (persistent) or "memory" (overrides the config file)
    #[arg(short = 'B', long, global = true)]
    pub backend: Option<String>,

    /// TOML configuration file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Score ages outside 1..=150 instead of rejecting them
    #[arg(long, global = true)]
    pub legacy_ages: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Score 24 comma-separated lustrum totals (nothing is stored)
    Score {
        /// Chronological age
        #[arg(short, long, allow_negative_numbers = true)]
        age: i64,

        /// 24 comma-separated totals, earliest life stage first
        #[arg(short, long)]
        totals: String,
    },

    /// Score and store a checklist
    Submit {
        /// Chronological age
        #[arg(short, long, allow_negative_numbers = true)]
        age: i64,

        /// JSON file: an array of 144 answers or an object of l{n}_q{j} fields
        #[arg(short, long)]
        responses: PathBuf,
    },

    /// List stored records
    List {
        /// Case-insensitive search text
        #[arg(short, long)]
        search: Option<String>,

        /// Sort column (id, age, observed, predicted, percentage, zone)
        #[arg(short, long, default_value = "id")]
        order_by: String,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Offset of the first record
        #[arg(long, default_value = "0")]
        start: usize,

        /// Number of records to show
        #[arg(short, long)]
        length: Option<usize>,
    },

    /// Show one record
    Show {
        /// Record id
        id: u64,
    },

    /// Delete a record
    Delete {
        /// Record id
        id: u64,
    },

    /// Restore the most recently deleted record
    Undo,

    /// Export all records
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Export format (csv, json)
        #[arg(short = 't', long, default_value = "csv")]
        format: String,

        /// Use display labels in the CSV header
        #[arg(long)]
        labels: bool,
    },

    /// Show archive status
    Status,

    /// Initialize a new empty database
    Init {
        /// Force initialization even if database exists
        #[arg(short, long)]
        force: bool,
    },

    /// Reclaim free space in the database file
    Compact,

    /// Print the questionnaire
    Schema,
}

impl Cli {
    /// Effective settings: config file, then flags.
    pub fn resolve_config(&self) -> Result<AppConfig, MaturogramError> {
        let mut config = AppConfig::load_or_default(self.config.as_deref())?;
        if let Some(database) = &self.database {
            config.database = database.clone();
        }
        if let Some(backend) = &self.backend {
            config.backend = backend.parse::<Backend>()?;
        }
        if self.legacy_ages {
            config.age_policy = AgePolicy::Legacy;
        }
        Ok(config)
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), MaturogramError> {
    let config = cli.resolve_config()?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => cmd_server(&config, host, port).await,
        Some(Commands::Score { age, totals }) => cmd_score(&config, json_mode, age, &totals),
        Some(Commands::Submit { age, responses }) => {
            cmd_submit(&config, json_mode, age, &responses)
        }
        Some(Commands::List {
            search,
            order_by,
            desc,
            start,
            length,
        }) => cmd_list(&config, json_mode, search, &order_by, desc, start, length),
        Some(Commands::Show { id }) => cmd_show(&config, json_mode, id),
        Some(Commands::Delete { id }) => cmd_delete(&config, json_mode, id),
        Some(Commands::Undo) => cmd_undo(&config, json_mode),
        Some(Commands::Export {
            output,
            format,
            labels,
        }) => cmd_export(&config, &output, &format, labels),
        Some(Commands::Status) => cmd_status(&config, json_mode),
        Some(Commands::Init { force }) => cmd_init(&config, force),
        Some(Commands::Compact) => cmd_compact(&config, json_mode),
        Some(Commands::Schema) => cmd_schema(json_mode),
        None => cmd_status(&config, json_mode),
    }
}
