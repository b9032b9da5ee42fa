pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod hasher;
pub mod normalize;
pub mod progress;
pub mod report;
pub mod scanner;
pub mod similarity;

pub use config::{AppConfig, MatchMode};
pub use engine::{ScanEngine, ScanOutcome};
pub use error::Error;
pub use progress::{ProgressReporter, SilentReporter};
