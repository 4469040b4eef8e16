//! MTG Collection Manager - data layer CLI
//!
//! `import` converts an Archidekt CSV export to collection.json;
//! `apply` consumes a changes.json batch exported from the web UI.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use mtg_collection::{app, CollectionError};

/// MTG collection data manager - imports card exports and applies change batches
#[derive(Parser, Debug)]
#[command(name = "mtg_collection")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert an Archidekt CSV export to collection.json
    Import {
        /// Path to the CSV export (auto-detected from the output directory when omitted)
        csv_file: Option<PathBuf>,

        /// Output path for the generated collection file
        #[arg(long, default_value = "./mtg/data/collection.json")]
        output: PathBuf,
    },

    /// Apply a changes.json batch to the collection data files
    Apply {
        /// Path to the change batch
        #[arg(default_value = "changes.json")]
        changes_file: PathBuf,

        /// Directory holding collection.json, decks.json and binders.json
        #[arg(long, default_value = "./mtg/data")]
        data_dir: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Import { csv_file, output } => {
            if let Err(e) = app::run_import(csv_file, &output) {
                log::error!("{e}");
                if matches!(
                    e,
                    CollectionError::NoCsvFound { .. } | CollectionError::MultipleCsvFound { .. }
                ) {
                    eprintln!("Usage: mtg_collection import [CSV_FILE] [--output ./mtg/data/collection.json]");
                }
                std::process::exit(1);
            }
        }

        Command::Apply {
            changes_file,
            data_dir,
        } => match app::run_apply(&changes_file, &data_dir) {
            Ok(summary) => {
                log::info!(
                    "Applied {} change(s), skipped {}",
                    summary.report.total_applied(),
                    summary.report.total_skipped()
                );
                log::info!("Done! Commit the updated data files to git.");
            }
            Err(e) => {
                log::error!("{e}");
                if matches!(e, CollectionError::ChangesNotFound { .. }) {
                    eprintln!("Usage: mtg_collection apply [changes.json] [--data-dir ./mtg/data]");
                }
                std::process::exit(1);
            }
        },
    }
}
