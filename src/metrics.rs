//! Vendor-agnostic metrics collection via a pluggable sink.
//!
//! **Note:** This module is only available when the `observability` feature is enabled.
//!
//! Implement [`MetricsSink`] and install it once with [`set_sink`]:
//!
//! ```ignore
//! use permgate_core::metrics::{EvaluationStats, MetricsSink, ReloadStats};
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use std::sync::Arc;
//!
//! struct DenyCounter {
//!     denies: AtomicU64,
//! }
//!
//! impl MetricsSink for DenyCounter {
//!     fn on_evaluation(&self, stats: &EvaluationStats) {
//!         if !stats.allowed {
//!             self.denies.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn on_reload(&self, _stats: &ReloadStats) {}
//! }
//!
//! permgate_core::metrics::set_sink(Arc::new(DenyCounter { denies: AtomicU64::new(0) }));
//! ```

use serde::Serialize;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::warn;

use crate::timers::PhaseDurations;
use crate::types::DenyReason;

/// Snapshot of one evaluation, passed to [`MetricsSink::on_evaluation`].
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationStats {
    /// Total time spent evaluating
    pub duration: Duration,
    /// Whether the decision was Allow
    pub allowed: bool,
    /// The identity as supplied, empty if it was missing
    pub identity: String,
    /// The expression mode (`roles`, `permissions` or the unrecognized token),
    /// `None` if the expression was missing or could not be decoded
    pub mode: Option<String>,
    /// Why the evaluation was denied, `None` when allowed
    pub deny_reason: Option<DenyReason>,
}

/// Evaluation time broken down by phase, in milliseconds.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationPhases {
    pub parse_ms: f64,
    pub resolve_ms: f64,
    pub match_ms: f64,
    pub total_ms: f64,
}

impl EvaluationPhases {
    pub(crate) fn from_durations(phases: &PhaseDurations, total: Duration) -> Self {
        EvaluationPhases {
            parse_ms: phases.parse.as_secs_f64() * 1_000.0,
            resolve_ms: phases.resolve.as_secs_f64() * 1_000.0,
            match_ms: phases.matching.as_secs_f64() * 1_000.0,
            total_ms: total.as_secs_f64() * 1_000.0,
        }
    }

    /// Time not accounted for in the measured phases
    pub fn overhead_ms(&self) -> f64 {
        self.total_ms - (self.parse_ms + self.resolve_ms + self.match_ms)
    }
}

/// Emitted after [`InMemoryDirectory::reload_from_str`](crate::InMemoryDirectory::reload_from_str).
#[derive(Debug, Clone, Serialize)]
pub struct ReloadStats {
    /// Time when the reload completed
    pub reload_time: std::time::SystemTime,
    /// Number of users after the reload
    pub users: usize,
}

/// Consumer of evaluation and reload metrics.
///
/// Called synchronously on the evaluation path, so implementations must be
/// thread-safe and should return quickly.
pub trait MetricsSink: Send + Sync {
    fn on_evaluation(&self, stats: &EvaluationStats);

    fn on_reload(&self, stats: &ReloadStats);

    /// Called with phase-level timing after `on_evaluation`. No-op by default.
    fn on_evaluation_phases(&self, _stats: &EvaluationStats, _phases: &EvaluationPhases) {}
}

struct NoOpSink;

impl MetricsSink for NoOpSink {
    fn on_evaluation(&self, _stats: &EvaluationStats) {}
    fn on_reload(&self, _stats: &ReloadStats) {}
}

static SINK: OnceLock<Arc<dyn MetricsSink>> = OnceLock::new();

fn sink() -> Arc<dyn MetricsSink> {
    SINK.get_or_init(|| Arc::new(NoOpSink)).clone()
}

/// Set the global metrics sink.
///
/// The sink can only be set once and cannot be swapped after the first
/// evaluation, so call this at startup.
pub fn set_sink(sink: Arc<dyn MetricsSink>) {
    if SINK.set(sink).is_err() {
        warn!(
            "Metrics sink was already initialized. Ignoring subsequent set_sink call. Set the sink before the first evaluation."
        );
    }
}

pub(crate) fn record_evaluation(stats: EvaluationStats, phases: &PhaseDurations) {
    let sink = sink();
    sink.on_evaluation(&stats);
    let phases = EvaluationPhases::from_durations(phases, stats.duration);
    sink.on_evaluation_phases(&stats, &phases);
}

pub(crate) fn record_reload(users: usize) {
    sink().on_reload(&ReloadStats {
        reload_time: std::time::SystemTime::now(),
        users,
    });
}
