use doppel::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// CLI progress reporter using indicatif progress bars.
///
/// - Walk phase: spinner (unknown total files upfront)
/// - Classify / hash / similarity phases: progress bars (totals known)
/// - Report phase: spinner
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn set_bar(&self, pb: ProgressBar) {
        let mut guard = self.bar.lock().unwrap();
        if let Some(old) = guard.take() {
            old.finish_and_clear();
        }
        *guard = Some(pb);
    }

    fn finish_bar(&self) {
        let mut guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.take() {
            pb.finish_and_clear();
        }
    }

    fn new_spinner(&self, message: &'static str) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.set_message(message);
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn new_phase_bar(&self, prefix: &'static str, total: usize) {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "  {spinner:.cyan} {prefix} [{bar:30.cyan/dim}] {pos}/{len} files ({eta} remaining)",
            )
            .unwrap()
            .progress_chars("━╸─")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.set_prefix(prefix);
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn set_position(&self, done: usize, total: usize) {
        let guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.as_ref() {
            if pb.length() != Some(total as u64) {
                pb.set_length(total as u64);
            }
            pb.set_position(done as u64);
        }
    }
}

impl Default for CliReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for CliReporter {
    fn on_walk_start(&self) {
        self.new_spinner("Scanning files...");
    }

    fn on_walk_complete(&self, total_files: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Walk complete: {} files in {:.2}s",
            total_files, duration_secs
        );
    }

    fn on_classify_start(&self, total_files: usize) {
        self.new_phase_bar("Classifying", total_files);
    }

    fn on_classify_progress(&self, files_done: usize, total_files: usize) {
        self.set_position(files_done, total_files);
    }

    fn on_classify_complete(&self, text_eligible: usize, binary_only: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Classify complete: {} text-eligible, {} binary in {:.2}s",
            text_eligible, binary_only, duration_secs
        );
    }

    fn on_hash_start(&self, total_files: usize) {
        self.new_phase_bar("Hashing", total_files);
    }

    fn on_hash_progress(&self, files_done: usize, total_files: usize) {
        self.set_position(files_done, total_files);
    }

    fn on_hash_complete(&self, duplicate_groups: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Hash complete: {} duplicate groups in {:.2}s",
            duplicate_groups, duration_secs
        );
    }

    fn on_similarity_start(&self, documents: usize) {
        self.new_phase_bar("Comparing", documents.saturating_sub(1));
    }

    fn on_similarity_progress(&self, rows_done: usize, total_rows: usize) {
        self.set_position(rows_done, total_rows);
    }

    fn on_similarity_complete(&self, pairs: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Similarity complete: {} pairs in {:.2}s",
            pairs, duration_secs
        );
    }

    fn on_report_start(&self) {
        self.new_spinner("Writing report...");
    }

    fn on_report_complete(&self, rows: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Report complete: {} rows in {:.2}s",
            rows, duration_secs
        );
    }
}
