// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for batch searches
// reference: uses indicatif for progress bars and tracks batch outcomes

use crate::error::Result;
use crate::models::BatchOutcome;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct BatchStats {
    pub batches_with_matches: usize,
    pub batches_without_matches: usize,
    pub batches_failed: usize,
    pub duration: Duration,
}

impl BatchStats {
    pub fn completed(&self) -> usize {
        self.batches_with_matches + self.batches_without_matches + self.batches_failed
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.completed();
        if total == 0 {
            return 0.0;
        }
        (self.batches_with_matches as f64 / total as f64) * 100.0
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    with_matches: AtomicUsize,
    without_matches: AtomicUsize,
    failed: AtomicUsize,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new(total_batches: usize) -> Self {
        Self::with_target(total_batches, ProgressDrawTarget::stderr())
    }

    pub fn hidden(total_batches: usize) -> Self {
        Self::with_target(total_batches, ProgressDrawTarget::hidden())
    }

    fn with_target(total_batches: usize, target: ProgressDrawTarget) -> Self {
        let multi_progress = MultiProgress::with_draw_target(target);

        let main_bar = create_progress_bar(&multi_progress, total_batches as u64);
        let detail_bar = create_detail_bar(&multi_progress);

        Self {
            main_bar,
            detail_bar,
            with_matches: AtomicUsize::new(0),
            without_matches: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record(&self, result: &Result<BatchOutcome>) {
        let counter = match result {
            Ok(BatchOutcome::Matches(_)) => &self.with_matches,
            Ok(BatchOutcome::NoMatch) => &self.without_matches,
            Ok(BatchOutcome::Failed { .. }) | Err(_) => &self.failed,
        };
        counter.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Batches searched");
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> BatchStats {
        BatchStats {
            batches_with_matches: self.with_matches.load(Ordering::SeqCst),
            batches_without_matches: self.without_matches.load(Ordering::SeqCst),
            batches_failed: self.failed.load(Ordering::SeqCst),
            duration: self.start_time.elapsed(),
        }
    }

    fn update_detail_bar(&self) {
        let message = format!(
            "Matches: {} | No match: {} | Failed: {}",
            self.with_matches.load(Ordering::SeqCst),
            self.without_matches.load(Ordering::SeqCst),
            self.failed.load(Ordering::SeqCst)
        );

        self.detail_bar.set_message(message);
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    bar.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} batches {msg}",
            )
            .expect("Failed to create progress bar template")
            .progress_chars("█▓▒░"),
    );
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    let style = ProgressStyle::default_bar()
        .template("{msg}")
        .expect("Failed to create detail bar template");
    bar.set_style(style);
    bar
}
