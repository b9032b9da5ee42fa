use crate::error::Error;
use clap::ValueEnum;
use config::{Config, ConfigError, File as ConfigFile};
use serde::Deserialize;
use std::path::Path;

/// Which matching engines run on a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    /// Fingerprint everything: semantic hash for text-bearing files,
    /// raw-byte hash for the rest.
    ExactOnly,
    /// Raw-byte hashing for binary files, TF-IDF similarity for text.
    Hybrid,
    /// TF-IDF similarity only; non-text files are ignored.
    TextOnly,
}

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.90;
pub const DEFAULT_MIN_TEXT_LEN: usize = 50;
pub const DEFAULT_VECTOR_OPS_THRESHOLD: usize = 500;
pub const DEFAULT_REPORT_PATH: &str = "duplicate_report.csv";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub root_paths: Vec<String>,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    #[serde(default = "default_match_mode")]
    pub match_mode: MatchMode,
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
    #[serde(default = "default_min_text_len")]
    pub min_text_len: usize,
    #[serde(default = "default_vector_ops_threshold")]
    pub vector_ops_threshold: usize,
    #[serde(default)]
    pub strip_stop_words: bool,
    #[serde(default = "default_report_path")]
    pub report_path: String,
}

fn default_match_mode() -> MatchMode {
    MatchMode::Hybrid
}

fn default_similarity_threshold() -> f64 {
    DEFAULT_SIMILARITY_THRESHOLD
}

fn default_min_text_len() -> usize {
    DEFAULT_MIN_TEXT_LEN
}

fn default_vector_ops_threshold() -> usize {
    DEFAULT_VECTOR_OPS_THRESHOLD
}

fn default_report_path() -> String {
    DEFAULT_REPORT_PATH.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            root_paths: Vec::new(),
            ignore_patterns: Vec::new(),
            match_mode: default_match_mode(),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            min_text_len: DEFAULT_MIN_TEXT_LEN,
            vector_ops_threshold: DEFAULT_VECTOR_OPS_THRESHOLD,
            strip_stop_words: false,
            report_path: default_report_path(),
        }
    }
}

pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

impl AppConfig {
    /// Fatal-at-startup validation: a scan never begins with a bad config.
    pub fn validate(&self) -> Result<(), Error> {
        if self.root_paths.is_empty() {
            return Err(Error::InvalidConfig(
                "no root paths configured".to_string(),
            ));
        }
        for root in &self.root_paths {
            let path = Path::new(root);
            if !path.is_dir() {
                return Err(Error::InvalidConfig(format!(
                    "root path '{}' does not exist or is not a directory",
                    root
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(Error::InvalidConfig(format!(
                "similarity threshold {} outside [0, 1]",
                self.similarity_threshold
            )));
        }
        Ok(())
    }
}

/// Remove directories that are subdirectories of other directories in the list.
pub fn non_overlapping_directories(dirs: Vec<String>) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();

    for dir in dirs {
        let dir_path = Path::new(&dir);
        let mut should_add = true;
        let result_clone = result.clone();

        for res_dir in &result_clone {
            let res_dir_path = Path::new(res_dir);

            if dir_path.starts_with(res_dir_path) {
                should_add = false;
                break;
            }

            if res_dir_path.starts_with(dir_path) {
                result.retain(|x| x != res_dir);
                break;
            }
        }

        if should_add {
            result.push(dir);
        }
    }

    result
}
