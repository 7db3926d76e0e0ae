// CLI - argument definitions using clap
//
// Commands:
// - risk-console ui      --snapshot <path>
// - risk-console summary --snapshot <path>
// - risk-console view    --snapshot <path> [--search] [--tier] [--sort] [--page]
// - risk-console export  --snapshot <path> [--search] [--tier] [--sort] [--out-dir]

use clap::{Args, Parser, Subcommand};
use risk_console::{SortKey, TierFilter};
use std::path::PathBuf;

/// Risk Console - review, filter and export credit-risk records
#[derive(Parser, Debug)]
#[command(name = "risk-console")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Write logs to this file (used by the interactive console)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the interactive console (default)
    Ui(SnapshotArgs),

    /// Print the global summary of the snapshot
    Summary {
        #[command(flatten)]
        snapshot: SnapshotArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print one page of the filtered, sorted view
    View {
        #[command(flatten)]
        snapshot: SnapshotArgs,

        #[command(flatten)]
        query: QueryArgs,

        /// 1-based page number (out-of-range pages are pulled back in range)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Write the filtered, sorted view to users_export_<date>.csv
    Export {
        #[command(flatten)]
        snapshot: SnapshotArgs,

        #[command(flatten)]
        query: QueryArgs,

        /// Directory for the export file (overrides config)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct SnapshotArgs {
    /// Record snapshot (.json or .csv); falls back to the config file
    #[arg(long)]
    pub snapshot: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Case-insensitive substring of name or email
    #[arg(long, default_value = "")]
    pub search: String,

    /// all, low, medium or high (default from config)
    #[arg(long)]
    pub tier: Option<TierFilter>,

    /// name, income or loan (default from config)
    #[arg(long)]
    pub sort: Option<SortKey>,
}
