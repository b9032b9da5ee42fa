/// Trait for reporting scan progress.
///
/// The CLI implements this with indicatif bars; library users and tests use
/// `SilentReporter`. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_walk_start(&self) {}
    fn on_walk_complete(&self, _total_files: usize, _duration_secs: f64) {}
    fn on_classify_start(&self, _total_files: usize) {}
    fn on_classify_progress(&self, _files_done: usize, _total_files: usize) {}
    fn on_classify_complete(&self, _text_eligible: usize, _binary_only: usize, _duration_secs: f64) {
    }
    fn on_hash_start(&self, _total_files: usize) {}
    fn on_hash_progress(&self, _files_done: usize, _total_files: usize) {}
    fn on_hash_complete(&self, _duplicate_groups: usize, _duration_secs: f64) {}
    fn on_similarity_start(&self, _documents: usize) {}
    fn on_similarity_progress(&self, _rows_done: usize, _total_rows: usize) {}
    fn on_similarity_complete(&self, _pairs: usize, _duration_secs: f64) {}
    fn on_report_start(&self) {}
    fn on_report_complete(&self, _rows: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
