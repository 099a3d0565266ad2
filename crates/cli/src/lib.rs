//! CLI for QueryBench.
//!
//! This crate provides the command-line interface for QueryBench: the `run`
//! subcommand executing the configured benchmark, `check` for validating a
//! configuration without connecting, and the `load` collaborator that
//! populates the benchmarked table.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod config;
pub mod loader;

use clap::{Parser, Subcommand};
use config::BenchConfig;
use querybench_core::{DatabaseTarget, DriverKind};
use querybench_harness::{write_reports_json, BenchLog, BenchmarkRunner};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// QueryBench CLI.
#[derive(Parser, Debug)]
#[command(name = "querybench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the configured benchmark and append reports to the log file.
    Run {
        /// Path to the benchmark configuration file.
        #[arg(short, long)]
        config: PathBuf,

        /// Override the configured log file path.
        #[arg(long)]
        log: Option<PathBuf>,

        /// Additionally write all reports as a pretty JSON document.
        #[arg(long)]
        json: Option<PathBuf>,

        /// Verbose output.
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate a configuration and print the execution plan without
    /// connecting to any target.
    Check {
        /// Path to the benchmark configuration file.
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Load a traffic-incident export into a target database.
    ///
    /// Creates the `crash_data` table if it does not exist and imports the
    /// file row by row; tab-separated for `.tsv`, comma-separated otherwise.
    Load {
        /// Driver identifier: postgres, mysql, or sqlite.
        #[arg(long)]
        driver: String,

        /// Connection URL.
        #[arg(long)]
        url: String,

        /// User name.
        #[arg(long, default_value = "")]
        user: String,

        /// Password.
        #[arg(long, default_value = "")]
        password: String,

        /// Input file to import.
        #[arg(long)]
        file: PathBuf,
    },
}

/// Run the CLI with the given arguments.
///
/// # Returns
///
/// Returns `Ok(())` on success, or an error if the command fails.
pub fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Commands::Run {
            config,
            log,
            json,
            verbose,
        } => {
            let mut cfg = BenchConfig::load(&config)?;
            if let Some(log) = log {
                cfg.log_file = log;
            }
            let targets = cfg.resolved_targets()?;

            let runner = BenchmarkRunner::new(
                BenchLog::new(&cfg.log_file),
                cfg.timeout(),
                cfg.runs,
                cfg.schedule,
            );
            let reports = runtime.block_on(runner.run(&targets, &cfg.queries))?;

            println!(
                "Completed {} report(s) across {} target(s)",
                reports.len(),
                targets.len()
            );
            println!("Results appended to {}", cfg.log_file.display());

            if verbose {
                for report in &reports {
                    println!(
                        "  - [{}] {}: median {:.2}ms over {} runs",
                        report.database, report.query, report.stats.median, report.runs
                    );
                }
            }

            if let Some(path) = json {
                write_reports_json(&reports, &path)?;
                println!("JSON results written to {}", path.display());
            }

            Ok(())
        }

        Commands::Check { config } => {
            let cfg = BenchConfig::load(&config)?;
            let targets = cfg.resolved_targets()?;

            println!("Configuration OK");
            println!("Targets:");
            for target in &targets {
                println!("  - {} ({})", target.name, target.driver);
            }
            println!("Queries: {}", cfg.queries.len());
            println!(
                "Schedule: {} ({} runs, {} executions per target)",
                cfg.schedule,
                cfg.runs,
                cfg.queries.len() * cfg.runs as usize
            );
            println!("Timeout: {}s", cfg.timeout_secs);

            Ok(())
        }

        Commands::Load {
            driver,
            url,
            user,
            password,
            file,
        } => {
            let kind = DriverKind::try_from(driver.as_str())?;
            let target = DatabaseTarget::new("loader", kind, url, user, password);
            let outcome = runtime.block_on(loader::load_file(&target, &file))?;
            println!(
                "Imported {} row(s), skipped {}",
                outcome.imported, outcome.skipped
            );
            Ok(())
        }
    }
}
