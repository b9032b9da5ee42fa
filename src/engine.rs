use crate::classifier::{self, ClassifyStats, FileCategory, FileRecord};
use crate::config::{self, AppConfig, MatchMode};
use crate::error::Error;
use crate::hasher::{self, DuplicateGroup};
use crate::progress::ProgressReporter;
use crate::report::{self, DedupReport};
use crate::scanner;
use crate::similarity::{self, SimilarityPair};
use chrono::{DateTime, Utc};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub struct ScanEngine {
    config: AppConfig,
    cancel: Arc<AtomicBool>,
}

/// Summary of one scan invocation, with the merged report.
#[derive(Debug)]
pub struct ScanOutcome {
    pub started_at: DateTime<Utc>,
    pub report: DedupReport,
    pub total_files: usize,
    pub classify_stats: ClassifyStats,
    pub read_failures: usize,
    pub report_path: PathBuf,
    pub report_rows: usize,
    pub cancelled: bool,
    pub walk_duration: Duration,
    pub classify_duration: Duration,
    pub hash_duration: Duration,
    pub similarity_duration: Duration,
    pub report_duration: Duration,
}

impl ScanEngine {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Token for external cancellation. Setting it mid-scan makes the
    /// pipeline skip files not yet processed; everything already processed
    /// still flows into a valid (partial) report.
    pub fn cancel_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Run the full duplicate detection pipeline:
    /// 1. Parallel directory walk (file_size → paths map, flattened sorted)
    /// 2. Classification into text-eligible / binary-only
    /// 3. Exact matching by fingerprint (routing depends on the mode)
    /// 4. TF-IDF similarity over the text corpus (ditto)
    /// 5. Merged, ranked CSV report
    ///
    /// All accumulated state (fingerprint map, vocabulary, diagnostics) is
    /// owned by this invocation; repeated or concurrent scans never share
    /// anything.
    pub fn scan(&self, reporter: &dyn ProgressReporter) -> Result<ScanOutcome, Error> {
        self.config.validate()?;
        self.cancel.store(false, Ordering::Relaxed);
        let started_at = Utc::now();

        let non_overlapping =
            config::non_overlapping_directories(self.config.root_paths.clone());
        info!("Processing directories: {:?}", non_overlapping);

        let root_path_slices: Vec<&str> =
            non_overlapping.iter().map(|s| s.as_str()).collect();
        let ignore_pattern_slices: Vec<&str> = self
            .config
            .ignore_patterns
            .iter()
            .map(|s| s.as_str())
            .collect();

        // Phase 1: Walk
        info!("Scanning files...");
        reporter.on_walk_start();
        let walk_start = Instant::now();
        let size_map =
            scanner::build_size_to_files_map(&root_path_slices, &ignore_pattern_slices)?;
        let files = scanner::flatten_sorted(&size_map);
        let walk_duration = walk_start.elapsed();
        let total_files = files.len();
        reporter.on_walk_complete(total_files, walk_duration.as_secs_f64());
        debug!(
            "Walk completed in {} — {} files",
            format!("{:.2}s", walk_duration.as_secs_f64()).green(),
            total_files,
        );

        // Phase 2: Classify
        info!("Classifying files...");
        reporter.on_classify_start(total_files);
        let classify_start = Instant::now();
        let (mut records, classify_stats) =
            classifier::classify_files(&files, &self.config, &self.cancel, reporter);
        records.sort_by(|a, b| a.path.cmp(&b.path));
        let classify_duration = classify_start.elapsed();
        reporter.on_classify_complete(
            classify_stats.text_eligible,
            classify_stats.binary_only,
            classify_duration.as_secs_f64(),
        );
        debug!(
            "Classify completed in {} — {} text-eligible, {} binary ({} vector-excluded, {} extraction failures, {} short-text fallbacks)",
            format!("{:.2}s", classify_duration.as_secs_f64()).green(),
            classify_stats.text_eligible,
            classify_stats.binary_only,
            classify_stats.vector_excluded,
            classify_stats.extraction_failures,
            classify_stats.short_text_fallbacks,
        );

        // Phase 3: Exact matching
        let exact_records: Vec<&FileRecord> = match self.config.match_mode {
            MatchMode::ExactOnly => records.iter().collect(),
            MatchMode::Hybrid => records
                .iter()
                .filter(|r| r.category == FileCategory::BinaryOnly)
                .collect(),
            MatchMode::TextOnly => Vec::new(),
        };

        info!("Fingerprinting {} files...", exact_records.len());
        reporter.on_hash_start(exact_records.len());
        let hash_start = Instant::now();
        let (groups, read_failures) = if exact_records.is_empty() {
            (Vec::<DuplicateGroup>::new(), 0)
        } else {
            hasher::build_fingerprint_groups(&exact_records, &self.cancel, reporter)
        };
        let hash_duration = hash_start.elapsed();
        reporter.on_hash_complete(groups.len(), hash_duration.as_secs_f64());
        debug!(
            "Hash completed in {} — {} duplicate groups, {} read failures",
            format!("{:.2}s", hash_duration.as_secs_f64()).green(),
            groups.len(),
            read_failures,
        );

        // Phase 4: Fuzzy matching. The corpus takes ownership of the
        // normalized text and is dropped as soon as scoring ends.
        let corpus: Vec<(PathBuf, String)> = match self.config.match_mode {
            MatchMode::ExactOnly => Vec::new(),
            MatchMode::Hybrid | MatchMode::TextOnly => records
                .into_iter()
                .filter_map(|record| {
                    record.normalized_text.map(|text| (record.path, text))
                })
                .collect(),
        };

        let similarity_start = Instant::now();
        let pairs: Vec<SimilarityPair> = if self.config.match_mode == MatchMode::ExactOnly {
            Vec::new()
        } else if corpus.len() < 2 {
            info!("Not enough text documents to compare.");
            Vec::new()
        } else {
            info!("Vectorizing {} text documents...", corpus.len());
            similarity::find_similar(
                &corpus,
                self.config.similarity_threshold,
                self.config.strip_stop_words,
                reporter,
            )
        };
        let similarity_duration = similarity_start.elapsed();
        reporter.on_similarity_complete(pairs.len(), similarity_duration.as_secs_f64());
        debug!(
            "Similarity completed in {} — {} pairs above {:.2}",
            format!("{:.2}s", similarity_duration.as_secs_f64()).green(),
            pairs.len(),
            self.config.similarity_threshold,
        );
        drop(corpus);

        // Phase 5: Report
        info!("Writing report...");
        reporter.on_report_start();
        let report_start = Instant::now();
        let dedup_report = report::build(groups, pairs);
        let report_path = PathBuf::from(&self.config.report_path);
        let report_rows = report::write_csv(&dedup_report, &report_path)?;
        let report_duration = report_start.elapsed();
        reporter.on_report_complete(report_rows, report_duration.as_secs_f64());

        report::log_summary(&dedup_report, 5);
        info!(
            "Report saved to {}",
            format!("{}", report_path.display()).green()
        );

        let cancelled = self.cancel.load(Ordering::Relaxed);
        if cancelled {
            info!("Scan cancelled — report covers files processed so far.");
        }

        Ok(ScanOutcome {
            started_at,
            report: dedup_report,
            total_files,
            classify_stats,
            read_failures,
            report_path,
            report_rows,
            cancelled,
            walk_duration,
            classify_duration,
            hash_duration,
            similarity_duration,
            report_duration,
        })
    }
}
