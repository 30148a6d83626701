// Patch run metrics module
//
// Provides lightweight counters for monitoring a patch run and progress
// reporting for each record collection

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Run-wide counters
///
/// Uses atomic operations so stages can record through a shared reference.
/// Counters are logged once at the end of the run by [`Metrics::log_summary`].
#[derive(Debug)]
pub struct Metrics {
    /// Records visited across every collection
    pub records_processed: AtomicU64,

    /// Records written back as overrides
    pub records_changed: AtomicU64,

    /// Records created in the patch plugin (siblings, outfits, classes)
    pub records_created: AtomicU64,

    /// Leveled lists split into weak/strong siblings
    pub lists_split: AtomicU64,

    /// Leveled lists recognised as artifact lists
    pub artifact_lists: AtomicU64,

    /// Leveled lists left alone because processing would empty them
    pub lists_discarded: AtomicU64,

    /// Steps short-circuited by an invariant violation (e.g. zero weight sum)
    pub steps_skipped: AtomicU64,

    /// Run start time
    start_time: Instant,
}

impl Metrics {
    /// Create a new Metrics instance
    pub fn new() -> Self {
        Self {
            records_processed: AtomicU64::new(0),
            records_changed: AtomicU64::new(0),
            records_created: AtomicU64::new(0),
            lists_split: AtomicU64::new(0),
            artifact_lists: AtomicU64::new(0),
            lists_discarded: AtomicU64::new(0),
            steps_skipped: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a visited record
    pub fn record_processed(&self, changed: bool) {
        self.records_processed.fetch_add(1, Ordering::Relaxed);
        if changed {
            self.records_changed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a newly created record
    pub fn record_created(&self) {
        self.records_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_list_split(&self) {
        self.lists_split.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_artifact_list(&self) {
        self.artifact_lists.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_list_discarded(&self) {
        self.lists_discarded.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a step skipped because its inputs violated an invariant
    pub fn record_step_skipped(&self) {
        self.steps_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total run time
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!("=== Patch Run Summary ===");
        tracing::info!("Elapsed: {:.2}s", self.elapsed().as_secs_f64());
        tracing::info!(
            "Records: {} processed, {} changed, {} created",
            self.records_processed.load(Ordering::Relaxed),
            self.records_changed.load(Ordering::Relaxed),
            self.records_created.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Leveled lists: {} split, {} artifact, {} kept to avoid emptying",
            self.lists_split.load(Ordering::Relaxed),
            self.artifact_lists.load(Ordering::Relaxed),
            self.lists_discarded.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Skipped steps: {}",
            self.steps_skipped.load(Ordering::Relaxed)
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Progress reporting for a single record collection.
///
/// Logs every `interval` records and once more with the final count.
#[derive(Debug)]
pub struct CollectionProgress {
    collection: &'static str,
    interval: u64,
    processed: u64,
    changed: u64,
}

impl CollectionProgress {
    pub fn new(collection: &'static str, interval: u64) -> Self {
        Self {
            collection,
            interval,
            processed: 0,
            changed: 0,
        }
    }

    pub fn record(&mut self, changed: bool) {
        self.processed += 1;
        if changed {
            self.changed += 1;
        }
        if self.interval > 0 && self.processed % self.interval == 0 {
            tracing::info!("Processed {} {}.", self.processed, self.collection);
        }
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }

    pub fn changed(&self) -> u64 {
        self.changed
    }

    /// Log the final count and fold it into the run metrics.
    pub fn finish(self, metrics: &Metrics) {
        tracing::info!(
            "Processed {} {} in total, {} changed.",
            self.processed,
            self.collection,
            self.changed
        );
        metrics
            .records_processed
            .fetch_add(self.processed, Ordering::Relaxed);
        metrics
            .records_changed
            .fetch_add(self.changed, Ordering::Relaxed);
    }
}
