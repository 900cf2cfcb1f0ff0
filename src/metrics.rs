// Run metrics module
//
// Counts what a validation run touched and how IDs were reconciled

use crate::models::Resolution;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Counters for one validation run
///
/// Uses atomics so checks can record through a shared reference.
/// Logged once at the end of the run.
#[derive(Debug)]
pub struct RunMetrics {
    /// Fix modules scanned by the link check
    pub files_scanned: AtomicUsize,

    /// Candidate IDs across all platforms
    pub candidates: AtomicUsize,

    /// HTTP requests issued against upstream catalogs
    pub requests: AtomicUsize,

    /// IDs found in a bulk catalog
    pub resolved_by_catalog: AtomicUsize,

    /// IDs found through a fallback endpoint
    pub resolved_by_fallback: AtomicUsize,

    /// GOG IDs matching a Steam fix
    pub resolved_by_alias: AtomicUsize,

    /// Steam IDs accepted from the delisted whitelist
    pub resolved_by_whitelist: AtomicUsize,

    start_time: Instant,
}

impl RunMetrics {
    pub fn new() -> Self {
        Self {
            files_scanned: AtomicUsize::new(0),
            candidates: AtomicUsize::new(0),
            requests: AtomicUsize::new(0),
            resolved_by_catalog: AtomicUsize::new(0),
            resolved_by_fallback: AtomicUsize::new(0),
            resolved_by_alias: AtomicUsize::new(0),
            resolved_by_whitelist: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_files(&self, count: usize) {
        self.files_scanned.fetch_add(count, Ordering::Relaxed);
    }

    /// Record the outcome of one platform's ID check
    pub fn record_resolution(&self, resolution: &Resolution) {
        self.candidates
            .fetch_add(resolution.candidates, Ordering::Relaxed);
        self.requests.fetch_add(resolution.requests, Ordering::Relaxed);
        self.resolved_by_catalog
            .fetch_add(resolution.by_catalog, Ordering::Relaxed);
        self.resolved_by_fallback
            .fetch_add(resolution.by_fallback, Ordering::Relaxed);
        self.resolved_by_alias
            .fetch_add(resolution.by_alias, Ordering::Relaxed);
        self.resolved_by_whitelist
            .fetch_add(resolution.whitelisted, Ordering::Relaxed);
    }

    pub fn whitelisted(&self) -> usize {
        self.resolved_by_whitelist.load(Ordering::Relaxed)
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!("=== Validation Summary ===");
        tracing::info!("Elapsed: {:.2}s", self.elapsed().as_secs_f64());
        tracing::info!(
            "Fix modules: {}, candidate ids: {}, requests: {}",
            self.files_scanned.load(Ordering::Relaxed),
            self.candidates.load(Ordering::Relaxed),
            self.requests.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Resolved: {} by catalog, {} by fallback, {} by Steam alias, {} whitelisted",
            self.resolved_by_catalog.load(Ordering::Relaxed),
            self.resolved_by_fallback.load(Ordering::Relaxed),
            self.resolved_by_alias.load(Ordering::Relaxed),
            self.whitelisted()
        );
    }
}

impl Default for RunMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = RunMetrics::new();
        assert_eq!(metrics.files_scanned.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.requests.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_record_resolutions_accumulate() {
        let metrics = RunMetrics::new();
        metrics.record_files(3);
        metrics.record_resolution(&Resolution {
            candidates: 4,
            by_catalog: 2,
            by_fallback: 1,
            whitelisted: 1,
            requests: 2,
            ..Resolution::default()
        });
        metrics.record_resolution(&Resolution {
            candidates: 2,
            by_catalog: 1,
            by_alias: 1,
            requests: 1,
            ..Resolution::default()
        });

        assert_eq!(metrics.files_scanned.load(Ordering::Relaxed), 3);
        assert_eq!(metrics.candidates.load(Ordering::Relaxed), 6);
        assert_eq!(metrics.requests.load(Ordering::Relaxed), 3);
        assert_eq!(metrics.resolved_by_catalog.load(Ordering::Relaxed), 3);
        assert_eq!(metrics.resolved_by_fallback.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.resolved_by_alias.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.whitelisted(), 1);
    }
}
