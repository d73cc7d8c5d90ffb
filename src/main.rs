//! Empyema Table 1 Aggregator CLI
//!
//! Pools per-site Table 1 statistics into multi-site summary tables.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use empyema_table1::aggregator::MeanPooling;
use empyema_table1::commands::{
    display_schema, display_version, execute_aggregate, validate_args,
    validate_site_document_file, AggregateArgs,
};

/// Empyema Table 1 Aggregator - multi-site pooling of descriptive statistics
#[derive(Parser, Debug)]
#[command(name = "table1-agg")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Pool all site documents found under a directory
    Aggregate {
        /// Directory searched recursively for site documents
        #[arg(short, long, default_value = ".", env = "TABLE1_INPUT_DIR")]
        input: PathBuf,

        /// Directory for the output tables (defaults to the input directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// How site means and SDs are combined
        #[arg(long, value_enum, default_value_t = MeanPooling::Unweighted)]
        pooling: MeanPooling,

        /// Print the pooled table to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a single site document
    Validate {
        /// Path to site JSON document
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display the expected site document schema
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Aggregate {
            input,
            output,
            pooling,
            summary,
        } => {
            let args = AggregateArgs {
                input_dir: input,
                output_dir: output,
                mean_pooling: pooling,
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            let written = execute_aggregate(args)?;
            if !written.is_empty() {
                println!("\n{}", "=".repeat(60));
                println!("All tables generated successfully!");
                println!("{}", "=".repeat(60));
            }
        }

        Commands::Validate { file } => {
            validate_site_document_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
