//! TOC CLI - table-of-contents summaries for structural diffs
//!
//! Reads diff documents produced by a structural differ and reports which
//! functions and methods each change touched.

use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::*;
use config::TocConfig;
use output::{OutputConfig, OutputFormat};

/// Summarize structural diffs as a table of contents.
#[derive(Parser)]
#[command(name = "toc")]
#[command(author, version)]
#[command(about = "Table-of-contents summaries for structural diffs")]
#[command(propagate_version = true)]
#[command(after_help = "Examples:
  toc summarize change.json          Summarize one diff
  toc summarize *.json --format json Merged JSON document for many diffs
  toc records change.json --raw      Inspect records before deduplication")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format (overrides config default)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize one or more diff documents
    #[command(visible_alias = "s")]
    Summarize {
        /// Diff documents (JSON)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Single-line JSON output
        #[arg(long)]
        compact: bool,

        /// Worker threads (defaults to one per CPU)
        #[arg(short = 'j', long, env = "TOC_THREADS")]
        threads: Option<usize>,
    },

    /// Show the change records found in one diff document
    Records {
        /// Diff document (JSON)
        file: PathBuf,

        /// Show records before deduplication
        #[arg(long)]
        raw: bool,

        /// Single-line JSON output
        #[arg(long)]
        compact: bool,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = TocConfig::load(Path::new("."));

    // CLI flag > config default > Table
    let format = cli.format.unwrap_or_else(|| {
        config
            .default_format()
            .and_then(|f| f.parse().ok())
            .unwrap_or(OutputFormat::Table)
    });

    let output = OutputConfig::auto_detect_with_color_override(format, config.use_color());
    output.apply_color();

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            let _ = Cli::command().print_help();
            println!();
            return Ok(());
        }
    };

    match command {
        Commands::Summarize {
            files,
            compact,
            threads,
        } => {
            let output = output.with_compact(compact || config.compact());
            summarize::run(&files, threads.or(config.threads()), output).await
        }
        Commands::Records { file, raw, compact } => {
            let output = output.with_compact(compact || config.compact());
            records::run(&file, raw, output).await
        }
    }
}
