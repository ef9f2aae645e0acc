// Performance metrics for the rules engines
//
// Tracks decision counts and execution times for the three rule paths so slow
// spots surface in logs without an external metrics stack.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Performance threshold for slow operations (50ms)
const SLOW_OPERATION_THRESHOLD_MS: u64 = 50;

/// Metrics for the rules engines
#[derive(Debug, Clone)]
pub struct RulesMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    admission_checks: AtomicU64,
    admissions_rejected: AtomicU64,
    quotes: AtomicU64,
    commission_splits: AtomicU64,

    total_admission_time_us: AtomicU64,
    total_quote_time_us: AtomicU64,
    total_split_time_us: AtomicU64,

    slow_operations: AtomicU64,
}

impl RulesMetrics {
    /// Create a new RulesMetrics instance
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner::default()),
        }
    }

    /// Record a rejected admission
    pub fn record_rejection(&self) {
        self.inner.admissions_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Start timing an admission check
    pub fn start_admission_check(&self) -> OperationTimer {
        OperationTimer::new(OperationType::Admission, self.clone())
    }

    /// Start timing a pricing quote
    pub fn start_quote(&self) -> OperationTimer {
        OperationTimer::new(OperationType::Quote, self.clone())
    }

    /// Start timing a commission split
    pub fn start_split(&self) -> OperationTimer {
        OperationTimer::new(OperationType::Split, self.clone())
    }

    fn record(&self, op: OperationType, duration: Duration) {
        let micros = duration.as_micros() as u64;
        match op {
            OperationType::Admission => {
                self.inner.admission_checks.fetch_add(1, Ordering::Relaxed);
                self.inner
                    .total_admission_time_us
                    .fetch_add(micros, Ordering::Relaxed);
            }
            OperationType::Quote => {
                self.inner.quotes.fetch_add(1, Ordering::Relaxed);
                self.inner
                    .total_quote_time_us
                    .fetch_add(micros, Ordering::Relaxed);
            }
            OperationType::Split => {
                self.inner.commission_splits.fetch_add(1, Ordering::Relaxed);
                self.inner
                    .total_split_time_us
                    .fetch_add(micros, Ordering::Relaxed);
            }
        }

        if duration.as_millis() as u64 > SLOW_OPERATION_THRESHOLD_MS {
            self.inner.slow_operations.fetch_add(1, Ordering::Relaxed);
            tracing::warn!("Slow {:?} operation: {}ms", op, duration.as_millis());
        }
    }

    /// Get a snapshot of the counters
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            admission_checks: self.inner.admission_checks.load(Ordering::Relaxed),
            admissions_rejected: self.inner.admissions_rejected.load(Ordering::Relaxed),
            quotes: self.inner.quotes.load(Ordering::Relaxed),
            commission_splits: self.inner.commission_splits.load(Ordering::Relaxed),
            slow_operations: self.inner.slow_operations.load(Ordering::Relaxed),
        }
    }
}

impl Default for RulesMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
enum OperationType {
    Admission,
    Quote,
    Split,
}

/// Timer that records its operation on drop
pub struct OperationTimer {
    start: Instant,
    operation_type: OperationType,
    metrics: RulesMetrics,
}

impl OperationTimer {
    fn new(operation_type: OperationType, metrics: RulesMetrics) -> Self {
        Self {
            start: Instant::now(),
            operation_type,
            metrics,
        }
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        self.metrics.record(self.operation_type, self.start.elapsed());
    }
}

/// Snapshot of the metric counters
#[derive(Debug, Clone)]
pub struct MetricsSummary {
    pub admission_checks: u64,
    pub admissions_rejected: u64,
    pub quotes: u64,
    pub commission_splits: u64,
    pub slow_operations: u64,
}
