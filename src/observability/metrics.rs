//! Prometheus metrics for a health gate.
//!
//! Each gate owns its own [`Registry`], so several gates in one process do
//! not collide on metric names.

use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

use crate::gate::GateState;

/// Metrics recorded by one gate controller.
pub struct GateMetrics {
    registry: Registry,

    /// Poll cycles executed
    pub cycles_total: IntCounter,

    /// Cycles where no health status could be obtained
    pub evaluation_failures_total: IntCounter,

    /// Probe connections accepted and closed
    pub probes_accepted_total: IntCounter,

    /// Bind state transitions by target state
    pub transitions_total: IntCounterVec,

    /// 1 while the listener is bound
    pub bound: IntGauge,
}

impl GateMetrics {
    /// Create a new metrics registry with all gate metrics.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let cycles_total = IntCounter::new("health_gate_cycles_total", "Total poll cycles")?;
        registry.register(Box::new(cycles_total.clone()))?;

        let evaluation_failures_total = IntCounter::new(
            "health_gate_evaluation_failures_total",
            "Health evaluations that failed or timed out",
        )?;
        registry.register(Box::new(evaluation_failures_total.clone()))?;

        let probes_accepted_total = IntCounter::new(
            "health_gate_probes_accepted_total",
            "Probe connections accepted and closed",
        )?;
        registry.register(Box::new(probes_accepted_total.clone()))?;

        let transitions_total = IntCounterVec::new(
            Opts::new(
                "health_gate_transitions_total",
                "Listener bind state transitions",
            ),
            &["state"],
        )?;
        registry.register(Box::new(transitions_total.clone()))?;

        let bound = IntGauge::new("health_gate_bound", "Whether the gate listener is bound")?;
        registry.register(Box::new(bound.clone()))?;

        Ok(Self {
            registry,
            cycles_total,
            evaluation_failures_total,
            probes_accepted_total,
            transitions_total,
            bound,
        })
    }

    /// Record a transition into `state`.
    pub fn record_transition(&self, state: GateState) {
        self.transitions_total
            .with_label_values(&[state.as_str()])
            .inc();
        self.bound.set(i64::from(state == GateState::Bound));
    }

    /// Number of transitions into `state` so far.
    pub fn transitions(&self, state: GateState) -> u64 {
        self.transitions_total
            .with_label_values(&[state.as_str()])
            .get()
    }

    /// Export metrics in Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    /// Get the Prometheus registry (for custom metrics).
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Default for GateMetrics {
    fn default() -> Self {
        // Names are fixed and the registry is fresh, so registration cannot collide
        Self::new().expect("Failed to create gate metrics")
    }
}
