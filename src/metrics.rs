use std::time::{Duration, Instant};
use tracing::info;

/// Process-wide counters for the ingestion/publish pipeline.
pub struct EngineMetrics {
    pub reports_ingested: u64,
    pub reports_rejected: u64,
    pub messages_published: u64,
    pub messages_debounced: u64,
    pub gps_jump_holds_active: u64,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self {
            reports_ingested: 0,
            reports_rejected: 0,
            messages_published: 0,
            messages_debounced: 0,
            gps_jump_holds_active: 0,
        }
    }

    pub fn reset(&mut self) {
        self.reports_ingested = 0;
        self.reports_rejected = 0;
        self.messages_published = 0;
        self.messages_debounced = 0;
        // gps_jump_holds_active is a gauge, not a counter; not reset.
    }

    pub fn log(&self) {
        info!(
            "[Metrics] reports ingested: {}, rejected: {}, messages published: {}, debounced: {}, gps jump holds active: {}",
            self.reports_ingested,
            self.reports_rejected,
            self.messages_published,
            self.messages_debounced,
            self.gps_jump_holds_active,
        );
    }
}

impl Default for EngineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Logs and resets `EngineMetrics` on a fixed interval.
pub struct MetricsLogger {
    last_log: Instant,
    log_interval: Duration,
}

impl MetricsLogger {
    pub fn new(log_interval: Duration) -> Self {
        Self {
            last_log: Instant::now(),
            log_interval,
        }
    }

    /// Logs and resets `metrics` if the interval has elapsed. Returns true
    /// if metrics were logged.
    pub fn check_and_log(&mut self, metrics: &mut EngineMetrics) -> bool {
        if self.last_log.elapsed() >= self.log_interval {
            metrics.log();
            metrics.reset();
            self.last_log = Instant::now();
            true
        } else {
            false
        }
    }
}
