// Risk Console - command-line entry point
// Dispatches to the interactive console or the scripting subcommands.

mod cli;

// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::debug;

use cli::{Cli, Command, QueryArgs, SnapshotArgs};
use risk_console::logging::{self, LogTarget};
use risk_console::{
    export_date, load_snapshot, ordered_view, render, write_export, ConsoleConfig, GlobalSummary,
    RecordStore, RiskTier, ViewState,
};

fn main() {
    if let Err(err) = run() {
        eprintln!("❌ {:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ConsoleConfig::load_or_default(cli.config.as_deref())?;
    if let Some(log_file) = cli.log_file {
        config.log_file = Some(log_file);
    }

    let command = cli
        .command
        .unwrap_or_else(|| Command::Ui(SnapshotArgs::default()));

    let target = match (&command, config.log_file.as_deref()) {
        (Command::Ui(_), Some(path)) => LogTarget::File(path),
        (Command::Ui(_), None) => LogTarget::Off,
        _ => LogTarget::Stderr,
    };
    logging::init(target, cli.verbose)?;

    match command {
        Command::Ui(snapshot) => run_ui_mode(&config, &snapshot),
        Command::Summary { snapshot, json } => run_summary(&config, &snapshot, json),
        Command::View {
            snapshot,
            query,
            page,
            json,
        } => run_view(&config, &snapshot, &query, page, json),
        Command::Export {
            snapshot,
            query,
            out_dir,
        } => run_export(&config, &snapshot, &query, out_dir),
    }
}

fn snapshot_path<'a>(config: &'a ConsoleConfig, args: &'a SnapshotArgs) -> Result<&'a Path> {
    args.snapshot
        .as_deref()
        .or(config.snapshot.as_deref())
        .context("No snapshot given: pass --snapshot or set \"snapshot\" in the config file")
}

fn open_store(config: &ConsoleConfig, args: &SnapshotArgs) -> Result<RecordStore> {
    let path = snapshot_path(config, args)?;
    load_snapshot(path)
}

fn view_state(config: &ConsoleConfig, query: &QueryArgs) -> ViewState {
    ViewState::new(
        query.tier.unwrap_or(config.default_tier),
        query.sort.unwrap_or(config.default_sort),
    )
    .with_search(query.search.clone())
}

fn run_summary(config: &ConsoleConfig, args: &SnapshotArgs, json: bool) -> Result<()> {
    let store = open_store(config, args)?;
    let summary = GlobalSummary::of_store(&store);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let dist = summary.tier_distribution;
    println!("📊 Snapshot: {}", store.source().unwrap_or("-"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Total users:   {}", summary.total);
    println!("Avg income:    {:.0}", summary.mean_income);
    println!("Avg loan:      {:.0}", summary.mean_loan);
    for tier in RiskTier::ALL {
        println!(
            "{:<15}{:>5} ({:.1}%)",
            format!("{} risk:", tier.label()),
            dist.count(tier),
            dist.share(tier)
        );
    }

    Ok(())
}

fn run_view(
    config: &ConsoleConfig,
    args: &SnapshotArgs,
    query: &QueryArgs,
    page: usize,
    json: bool,
) -> Result<()> {
    let store = open_store(config, args)?;
    let state = view_state(config, query).with_page(page);
    let result = render(&store, &state);

    debug!(
        requested = page,
        served = result.page.number,
        filtered = result.filtered_count,
        "view rendered"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "{:<24} {:<30} {:>12} {:>8} {:>12} {:>6} {:<6}",
        "Name", "Email", "Income", "History", "Loan", "Score", "Risk"
    );
    for record in &result.page.items {
        println!(
            "{:<24} {:<30} {:>12.0} {:>8} {:>12.0} {:>6.1} {:<6}",
            record.name,
            record.email,
            record.annual_income,
            record.credit_history_years,
            record.loan_amount,
            record.risk_score,
            record.tier().label()
        );
    }
    println!(
        "\nShowing {} of {} users (Page {} of {}) • {} total in snapshot",
        result.page.items.len(),
        result.filtered_count,
        result.page.number,
        result.page.total_pages,
        result.summary.total
    );

    Ok(())
}

fn run_export(
    config: &ConsoleConfig,
    args: &SnapshotArgs,
    query: &QueryArgs,
    out_dir: Option<PathBuf>,
) -> Result<()> {
    let store = open_store(config, args)?;
    let state = view_state(config, query);
    let ordered = ordered_view(&store, &state);

    let dir = out_dir.unwrap_or_else(|| config.export_dir.clone());
    let today = export_date();
    let path = write_export(&dir, &ordered, today)?;

    println!("✓ Exported {} users to {}", ordered.len(), path.display());

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &ConsoleConfig, args: &SnapshotArgs) -> Result<()> {
    let store = open_store(config, args)?;
    let state = ViewState::new(config.default_tier, config.default_sort);

    let mut app = ui::App::new(store, state, config.export_dir.clone());
    ui::run_ui(&mut app)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &ConsoleConfig, _args: &SnapshotArgs) -> Result<()> {
    anyhow::bail!(
        "TUI mode not available. Rebuild with `--features tui`, or use the summary/view/export commands"
    )
}
