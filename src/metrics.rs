//! Vendor-agnostic metrics collection via a pluggable sink.
//!
//! The assembler reports one [`AssemblyStats`] per document, an optional
//! phase breakdown, and every dangling relation id it meets. Install a sink
//! once at startup with [`set_sink`]; until then everything is dropped.
//!
//! ```ignore
//! use sideload_core::metrics::{AssemblyStats, MetricsSink};
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use std::sync::Arc;
//!
//! struct DocumentCounter {
//!     documents: AtomicU64,
//! }
//!
//! impl MetricsSink for DocumentCounter {
//!     fn on_assembly(&self, _stats: &AssemblyStats) {
//!         self.documents.fetch_add(1, Ordering::Relaxed);
//!     }
//! }
//!
//! sideload_core::metrics::set_sink(Arc::new(DocumentCounter { documents: AtomicU64::new(0) }));
//! ```

use serde::Serialize;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::warn;

use crate::types::DanglingReference;

/// Snapshot of one assembled document, passed to [`MetricsSink::on_assembly`].
#[derive(Debug, Clone, Serialize)]
pub struct AssemblyStats {
    /// Wall-clock time from request to finished document
    pub duration: Duration,
    /// Singular name of the primary type
    pub primary_type: String,
    /// Primary representations emitted
    pub primary_count: usize,
    /// Linked representations emitted, across all groups
    pub linked_count: usize,
    /// Distinct relation paths in the link registry
    pub link_count: usize,
    /// Relation ids that could not be resolved
    pub dangling_count: usize,
}

/// Assembly time broken down by phase, in milliseconds.
#[derive(Debug, Clone, Serialize)]
pub struct AssemblyPhases {
    /// Relation walk over every root
    pub walk_ms: f64,
    /// Rendering of primary and linked representations
    pub render_ms: f64,
    pub total_ms: f64,
}

impl AssemblyPhases {
    /// Time not accounted for by the measured phases.
    pub fn overhead_ms(&self) -> f64 {
        self.total_ms - (self.walk_ms + self.render_ms)
    }
}

/// Consumer of assembly metrics.
///
/// Called synchronously on the request path, possibly from many threads at
/// once; implementations must be cheap and thread-safe.
pub trait MetricsSink: Send + Sync {
    /// Called once per assembled document.
    fn on_assembly(&self, stats: &AssemblyStats);

    /// Called once per assembled document with per-phase timings.
    fn on_assembly_phases(&self, _stats: &AssemblyStats, _phases: &AssemblyPhases) {}

    /// Called for every relation id with no resolvable instance.
    fn on_dangling_reference(&self, _reference: &DanglingReference) {}
}

static SINK: OnceLock<Arc<dyn MetricsSink>> = OnceLock::new();

/// Set the global metrics sink.
///
/// The sink can be set once; later calls are ignored with a warning.
/// Assemblies before the first call report nothing.
pub fn set_sink(sink: Arc<dyn MetricsSink>) {
    if SINK.set(sink).is_err() {
        warn!("Metrics sink was already initialized. Ignoring subsequent set_sink call.");
    }
}

/// Whether a sink has been installed.
pub fn is_enabled() -> bool {
    SINK.get().is_some()
}

pub(crate) fn record_assembly(stats: AssemblyStats, phases: AssemblyPhases) {
    if let Some(sink) = SINK.get() {
        sink.on_assembly(&stats);
        sink.on_assembly_phases(&stats, &phases);
    }
}

pub(crate) fn record_dangling(reference: &DanglingReference) {
    if let Some(sink) = SINK.get() {
        sink.on_dangling_reference(reference);
    }
}
