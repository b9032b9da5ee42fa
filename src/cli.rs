use clap::{Args, Parser, Subcommand};
use doppel::MatchMode;

#[derive(Debug, Parser)]
#[command(name = "doppel")]
#[command(about = "Find duplicate and near-duplicate documents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan directories for duplicate and near-duplicate documents
    Scan(ScanArgs),
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directories to scan (overrides root_paths from Config.toml)
    pub paths: Vec<String>,

    /// Matching mode
    #[arg(long, value_enum)]
    pub mode: Option<MatchMode>,

    /// Similarity threshold for fuzzy matching, in [0, 1]
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Where to write the CSV report
    #[arg(long)]
    pub report: Option<String>,

    /// Strip English stop words before TF-IDF weighting
    #[arg(long)]
    pub strip_stop_words: bool,
}
