use crate::error::Error;
use crate::hasher::DuplicateGroup;
use crate::similarity::SimilarityPair;
use ahash::AHashSet;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::info;

/// One row of the tabular report: a pair of paths and their score.
/// Exact matches carry 1.0.
#[derive(Debug, Clone)]
pub struct ReportRow {
    pub score: f64,
    pub path_a: PathBuf,
    pub path_b: PathBuf,
}

/// The merged result of one scan: exact groups, fuzzy pairs, and the
/// ranked pair rows derived from both.
#[derive(Debug, Default)]
pub struct DedupReport {
    pub groups: Vec<DuplicateGroup>,
    pub pairs: Vec<SimilarityPair>,
    pub rows: Vec<ReportRow>,
}

/// Merge exact groups (expanded to member pairs, score 1.0) with fuzzy
/// pairs into one ranked, deduplicated row list: score descending, then
/// lexicographic path pair.
pub fn build(groups: Vec<DuplicateGroup>, pairs: Vec<SimilarityPair>) -> DedupReport {
    let mut rows: Vec<ReportRow> = Vec::new();
    let mut seen: AHashSet<(PathBuf, PathBuf)> = AHashSet::new();

    for group in &groups {
        for i in 0..group.members.len() {
            for j in (i + 1)..group.members.len() {
                let key = (group.members[i].clone(), group.members[j].clone());
                if seen.insert(key.clone()) {
                    rows.push(ReportRow {
                        score: 1.0,
                        path_a: key.0,
                        path_b: key.1,
                    });
                }
            }
        }
    }

    for pair in &pairs {
        let key = (pair.path_a.clone(), pair.path_b.clone());
        if seen.insert(key) {
            rows.push(ReportRow {
                score: pair.score,
                path_a: pair.path_a.clone(),
                path_b: pair.path_b.clone(),
            });
        }
    }

    rows.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.path_a.cmp(&b.path_a))
            .then_with(|| a.path_b.cmp(&b.path_b))
    });

    DedupReport {
        groups,
        pairs,
        rows,
    }
}

/// Write the report as UTF-8 CSV: header row, 4-decimal fixed-point
/// scores, one row per pair. Returns the number of data rows written.
pub fn write_csv(report: &DedupReport, path: &Path) -> Result<usize, Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Similarity Score", "File A", "File B"])?;

    for row in &report.rows {
        writer.write_record(&[
            format!("{:.4}", row.score),
            row.path_a.to_string_lossy().into_owned(),
            row.path_b.to_string_lossy().into_owned(),
        ])?;
    }
    writer.flush()?;

    Ok(report.rows.len())
}

/// Console summary in the scan log: totals plus the top pairs by score.
pub fn log_summary(report: &DedupReport, top: usize) {
    if report.rows.is_empty() {
        info!("No duplicates found.");
        return;
    }

    info!(
        "{} duplicate groups, {} similarity pairs, {} report rows",
        format!("{}", report.groups.len()).red(),
        format!("{}", report.pairs.len()).red(),
        format!("{}", report.rows.len()).red(),
    );

    for row in report.rows.iter().take(top) {
        let name_a = row
            .path_a
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| row.path_a.to_string_lossy().into_owned());
        let name_b = row
            .path_b
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| row.path_b.to_string_lossy().into_owned());
        info!(
            "[{}] {} <-> {}",
            format!("{:.1}%", row.score * 100.0).green(),
            name_a,
            name_b
        );
    }
}
