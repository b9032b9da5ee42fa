mod cli;
mod logging;
mod reporter;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands, ScanArgs};
use colored::*;
use doppel::{config, AppConfig, ScanEngine};
use dotenv::dotenv;
use reporter::CliReporter;
use std::process;
use tracing::{debug, error, info};

fn main() {
    dotenv().ok();

    let _guard = logging::init_logger();

    let args = Cli::parse();

    match args.command {
        Some(Commands::Scan(scan_args)) => {
            let config = merge_config(scan_args);
            if let Err(err) = run_scan(config) {
                error!("Error: {}", err);
                process::exit(1);
            }
        }
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", load_base_config());
        }
        None => {
            let _ = Cli::command().print_long_help();
        }
    }
}

fn load_base_config() -> AppConfig {
    match config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            // No Config.toml is fine when paths come from the CLI.
            debug!("No configuration file loaded: {}", err);
            AppConfig::default()
        }
    }
}

fn merge_config(args: ScanArgs) -> AppConfig {
    let mut config = load_base_config();

    if !args.paths.is_empty() {
        config.root_paths = args.paths;
    }
    if let Some(mode) = args.mode {
        config.match_mode = mode;
    }
    if let Some(threshold) = args.threshold {
        config.similarity_threshold = threshold;
    }
    if let Some(report) = args.report {
        config.report_path = report;
    }
    if args.strip_stop_words {
        config.strip_stop_words = true;
    }

    config
}

fn run_scan(config: AppConfig) -> Result<(), doppel::Error> {
    let engine = ScanEngine::new(config);
    let reporter = CliReporter::new();
    let outcome = engine.scan(&reporter)?;

    println!();
    info!(
        "Walk: {}, Classify: {}, Hash: {}, Similarity: {}, Report: {}",
        format!("{:.2}s", outcome.walk_duration.as_secs_f64()).green(),
        format!("{:.2}s", outcome.classify_duration.as_secs_f64()).green(),
        format!("{:.2}s", outcome.hash_duration.as_secs_f64()).green(),
        format!("{:.2}s", outcome.similarity_duration.as_secs_f64()).green(),
        format!("{:.2}s", outcome.report_duration.as_secs_f64()).green(),
    );
    info!(
        "{} files scanned, {} duplicate groups, {} similarity pairs, {} report rows",
        format!("{}", outcome.total_files).cyan(),
        format!("{}", outcome.report.groups.len()).red(),
        format!("{}", outcome.report.pairs.len()).red(),
        format!("{}", outcome.report_rows).red(),
    );
    if outcome.read_failures > 0 || outcome.classify_stats.extraction_failures > 0 {
        info!(
            "{} read failures, {} extraction failures (files fell back or were skipped)",
            outcome.read_failures, outcome.classify_stats.extraction_failures,
        );
    }

    Ok(())
}
