//! tcp_health_gate - expose process health as a bare TCP port.
//!
//! Orchestrators (load balancers, container schedulers) probe a TCP port:
//! if the connection is accepted the process is healthy, if it is refused
//! it is not. This crate keeps such a port bound while health evaluates
//! `Healthy` and unbound otherwise, re-evaluating once per poll interval.
//!
//! # Architecture
//!
//! - [`gate::GateController`] - the poll loop; binds, drains and unbinds
//! - [`gate::drain_pending`] - accepts queued probes and closes them unread
//! - [`health::HealthEvaluator`] - source of the aggregate status
//! - [`host::Host`] - runs the gate next to other services with shared shutdown
//!
//! No bytes are ever exchanged with a probe. Connect success is the signal.
//!
//! # Example
//!
//! ```rust,ignore
//! use tcp_health_gate::config::GateConfig;
//! use tcp_health_gate::health::{self, HealthCheckRegistry, HealthCheckResult};
//! use tcp_health_gate::host::Host;
//!
//! let mut registry = HealthCheckRegistry::new();
//! registry.register(health::from_fn("self", || async { Ok(HealthCheckResult::healthy()) }));
//!
//! let mut host = Host::new();
//! host.add_health_gate(GateConfig::default(), registry)?;
//! host.run().await?;
//! ```

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git commit hash (8 chars), empty when built outside a git checkout
pub const BUILD_VERSION: &str = env!("BUILD_VERSION");

/// Boxed error used at service boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub mod config;
pub mod gate;
pub mod health;
pub mod host;
pub mod listener;
pub mod logging;
pub mod observability;
pub mod shutdown;

// Re-exports for convenience
pub use config::{Config, GateConfig};
pub use gate::{GateController, GateError, GateState};
pub use health::{HealthEvaluator, HealthStatus};
pub use host::Host;
