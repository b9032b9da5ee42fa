use crate::config::AppConfig;
use crate::extract::{self, ExtractOutcome};
use crate::normalize;
use crate::progress::ProgressReporter;
use crate::scanner::ScanFile;
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    TextEligible,
    BinaryOnly,
}

/// One discovered file after classification. Immutable from here on; owned
/// by the scan that produced it.
#[derive(Debug)]
pub struct FileRecord {
    pub path: PathBuf,
    pub category: FileCategory,
    /// Present iff the category is TextEligible.
    pub normalized_text: Option<String>,
    pub raw_size: u64,
}

/// Why a file ended up in its category; folded into ClassifyStats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    Text,
    Binary,
    FallbackVector,
    FallbackFailed,
    FallbackShort,
}

#[derive(Debug, Default, Clone)]
pub struct ClassifyStats {
    pub text_eligible: usize,
    pub binary_only: usize,
    pub vector_excluded: usize,
    pub extraction_failures: usize,
    pub short_text_fallbacks: usize,
}

/// Classify every discovered file into exactly one category. Embarrassingly
/// parallel: each file is independent, partial stats merge after the sweep.
/// Cancellation skips the files not yet started; records already produced
/// stay valid.
pub fn classify_files(
    files: &[ScanFile],
    config: &AppConfig,
    cancel: &AtomicBool,
    reporter: &dyn ProgressReporter,
) -> (Vec<FileRecord>, ClassifyStats) {
    let done = AtomicUsize::new(0);
    let total = files.len();

    let classified: Vec<(FileRecord, Disposition)> = files
        .par_iter()
        .filter_map(|scan_file| {
            if cancel.load(Ordering::Relaxed) {
                return None;
            }
            let result = classify_file(scan_file, config);
            let n = done.fetch_add(1, Ordering::Relaxed) + 1;
            reporter.on_classify_progress(n, total);
            Some(result)
        })
        .collect();

    let mut stats = ClassifyStats::default();
    for (_, disposition) in &classified {
        match disposition {
            Disposition::Text => stats.text_eligible += 1,
            Disposition::Binary => stats.binary_only += 1,
            Disposition::FallbackVector => {
                stats.binary_only += 1;
                stats.vector_excluded += 1;
            }
            Disposition::FallbackFailed => {
                stats.binary_only += 1;
                stats.extraction_failures += 1;
            }
            Disposition::FallbackShort => {
                stats.binary_only += 1;
                stats.short_text_fallbacks += 1;
            }
        }
    }

    let records = classified.into_iter().map(|(record, _)| record).collect();
    (records, stats)
}

fn classify_file(scan_file: &ScanFile, config: &AppConfig) -> (FileRecord, Disposition) {
    let binary = |disposition: Disposition| {
        (
            FileRecord {
                path: scan_file.path.clone(),
                category: FileCategory::BinaryOnly,
                normalized_text: None,
                raw_size: scan_file.size,
            },
            disposition,
        )
    };

    match extract::extract(&scan_file.path, config.vector_ops_threshold) {
        ExtractOutcome::NotApplicable => binary(Disposition::Binary),
        ExtractOutcome::VectorOrigin => binary(Disposition::FallbackVector),
        ExtractOutcome::Failed => binary(Disposition::FallbackFailed),
        ExtractOutcome::Extracted(raw) => {
            let normalized = normalize::normalize_text(&raw);
            // Short extractions are not a reliable similarity signal and
            // would flood the vocabulary with noise; they fall back to
            // raw-byte hashing instead of being dropped.
            if normalized.chars().count() > config.min_text_len {
                (
                    FileRecord {
                        path: scan_file.path.clone(),
                        category: FileCategory::TextEligible,
                        normalized_text: Some(normalized),
                        raw_size: scan_file.size,
                    },
                    Disposition::Text,
                )
            } else {
                binary(Disposition::FallbackShort)
            }
        }
    }
}
