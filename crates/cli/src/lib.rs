//! CLI for the benchmark result deduplicator.
//!
//! This crate provides the `bench-dedup` command-line interface: a
//! dry-run-by-default `run` subcommand, a read-only `check`
//! subcommand, and a `status` subcommand showing the effective
//! defaults.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

use anyhow::{bail, Context};
use bench_dedup_core::{DedupConfig, DedupPlan, Deduplicator, RunMode};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

/// How many combinations the previews display.
const PREVIEW_LIMIT: usize = 10;

/// Benchmark result deduplicator CLI.
#[derive(Parser, Debug)]
#[command(name = "bench-dedup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by the scanning subcommands.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Directory containing the result_*.json files.
    #[arg(long)]
    pub results_dir: Option<PathBuf>,

    /// Website token to allow (repeatable). Defaults to the built-in
    /// allow-list.
    #[arg(long = "website")]
    pub websites: Vec<String>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deduplicate result files: one kept file per (model, website,
    /// task) combination, failures preferred.
    ///
    /// Dry-run by default: computes the plan and writes it to a
    /// timestamped analysis_dedup_plan_*.json artifact without
    /// deleting anything. Pass --live to actually delete files and
    /// write an analysis_dedup_report_*.json artifact instead.
    Run {
        /// Scanning options.
        #[command(flatten)]
        scan: ScanArgs,

        /// Delete files instead of only planning.
        #[arg(long)]
        live: bool,

        /// Directory that receives plan/report artifacts.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Copy every scanned file here before deleting (live runs
        /// only).
        #[arg(long)]
        backup_dir: Option<PathBuf>,
    },

    /// Show duplicate statistics without planning any deletion.
    Check {
        /// Scanning options.
        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Show the effective configuration defaults.
    Status {
        /// Show the full website allow-list and artifact patterns.
        #[arg(short, long)]
        detailed: bool,
    },
}

/// Build a [`DedupConfig`] from the shared scanning options.
fn build_config(scan: &ScanArgs) -> DedupConfig {
    let mut config = DedupConfig::default();
    if let Some(dir) = &scan.results_dir {
        config = config.with_results_dir(dir);
    }
    if !scan.websites.is_empty() {
        config = config.with_target_websites(scan.websites.iter().cloned());
    }
    config
}

/// Run the CLI with the given arguments.
///
/// # Errors
///
/// Returns an error when the scan fails (missing results directory),
/// an artifact cannot be written, or a live run records deletion
/// errors.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Run {
            scan,
            live,
            output_dir,
            backup_dir,
        } => {
            let mut config = build_config(&scan).with_dry_run(!live);
            if let Some(dir) = output_dir {
                config = config.with_output_dir(dir);
            }
            if let Some(dir) = backup_dir {
                config = config.with_backup_dir(dir);
            }
            run_dedup(config)
        }
        Commands::Check { scan } => run_check(build_config(&scan)),
        Commands::Status { detailed } => {
            print_status(detailed);
            Ok(())
        }
    }
}

fn run_dedup(config: DedupConfig) -> anyhow::Result<()> {
    if config.dry_run {
        println!("{}", "DRY RUN - no files will be deleted".yellow().bold());
    } else {
        println!(
            "{}",
            "LIVE RUN - duplicate files will be deleted".red().bold()
        );
    }
    println!("Strategy: keep failed results for error analysis\n");

    let mut dedup = Deduplicator::new(config);
    let summary = dedup.run().context("deduplication run failed")?;
    let plan = &summary.plan;

    println!("Unique combinations:      {}", plan.unique_combinations);
    println!("Duplicated combinations:  {}", plan.duplicated_combinations);
    println!("Corrupted files:          {}", plan.corrupted_files);
    println!("Files to keep:            {}", plan.files_to_keep);
    println!("Files to delete:          {}", plan.files_to_delete);
    println!("Failed results preserved: {}", plan.failed_combinations_kept);

    print_keep_preview(plan);

    if summary.mode == RunMode::Live {
        println!("\nFiles deleted: {}", summary.files_deleted);
        println!("Errors:        {}", summary.errors);
    }
    if let Some(path) = &summary.artifact {
        println!("\nArtifact: {}", path.display());
    }

    match summary.mode {
        RunMode::DryRun => {
            println!(
                "\n{}",
                "Dry run only. Re-run with --live to delete the files listed in the plan."
                    .yellow()
            );
            Ok(())
        }
        RunMode::Live if !summary.is_clean() => {
            bail!("completed with {} deletion errors", summary.errors)
        }
        RunMode::Live => Ok(()),
    }
}

fn print_keep_preview(plan: &DedupPlan) {
    let duplicated: Vec<_> = plan
        .keep_list
        .iter()
        .filter(|k| k.total_files > 1)
        .collect();
    if duplicated.is_empty() {
        return;
    }

    println!(
        "\nTop {} deduplicated combinations:",
        PREVIEW_LIMIT.min(duplicated.len())
    );
    for entry in duplicated.iter().take(PREVIEW_LIMIT) {
        let status = if entry.success == Some(true) {
            "ok    ".green()
        } else {
            "failed".red()
        };
        let label = match entry.task_key.parts() {
            // Model names carry a provider prefix; the short form reads
            // better in a terminal column.
            Some((model, website, task_id)) => format!(
                "{} -> {} -> {}",
                model.split('/').next_back().unwrap_or(model),
                website,
                task_id
            ),
            None => entry.task_key.to_string(),
        };
        println!(
            "   {status} {label} (keeping 1/{}, {} failed)",
            entry.total_files, entry.failed_count
        );
    }
}

fn run_check(config: DedupConfig) -> anyhow::Result<()> {
    let mut dedup = Deduplicator::new(config);
    let check = dedup.check().context("duplicate check failed")?;

    println!("Result files:             {}", check.total_files);
    println!("Unique combinations:      {}", check.unique_combinations);
    println!("Successful combinations:  {}", check.successful_combinations);
    println!("Duplicated combinations:  {}", check.duplicated_combinations);
    println!("Surplus duplicate files:  {}", check.total_duplicate_files);
    println!("Corrupted files:          {}", check.corrupted_files);

    let top = check.top_duplicates(PREVIEW_LIMIT);
    if !top.is_empty() {
        println!("\nMost duplicated combinations:");
        for dup in top {
            println!(
                "   {}: {} files ({} successful)",
                dup.task_key, dup.count, dup.success_count
            );
        }
    }
    Ok(())
}

fn print_status(detailed: bool) {
    let config = DedupConfig::default();
    println!("bench-dedup {}", env!("CARGO_PKG_VERSION"));
    println!("Results directory: {}", config.results_dir.display());
    println!("Output directory:  {}", config.output_dir.display());
    println!("Dry run default:   {}", config.dry_run);

    if detailed {
        println!("\nWebsite allow-list:");
        for website in &config.target_websites {
            println!("  - {website}");
        }
        println!("\nArtifacts:");
        println!("  - analysis_dedup_plan_<millis>.json (dry run)");
        println!("  - analysis_dedup_report_<millis>.json (live run)");
    }
}
