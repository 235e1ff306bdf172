//! Observability for the health gate.
//!
//! Logging is plain `tracing` (see [`crate::logging`]); this module holds the
//! Prometheus metrics each gate records.
//!
//! ```rust,ignore
//! use tcp_health_gate::observability::GateMetrics;
//!
//! let metrics = GateMetrics::new()?;
//! metrics.cycles_total.inc();
//! println!("{}", metrics.export()?);
//! ```

pub mod metrics;

pub use metrics::GateMetrics;
