//! Health evaluation consumed by the gate.
//!
//! The gate only needs an aggregate [`HealthStatus`] per poll cycle, supplied
//! by any [`HealthEvaluator`]. [`HealthCheckRegistry`] is the stock evaluator:
//! it runs named [`HealthCheck`]s concurrently and rolls them up to the worst
//! status.
//!
//! ```rust,ignore
//! let mut registry = HealthCheckRegistry::new();
//! registry.register(health::from_fn("self", || async { Ok(HealthCheckResult::healthy()) }));
//! let status = registry.evaluate().await?;
//! ```

mod check;
mod evaluator;
mod registry;
mod status;

pub use check::{from_fn, FnCheck, HealthCheck};
pub use evaluator::{EvaluationError, HealthEvaluator};
pub use registry::HealthCheckRegistry;
pub use status::{CheckResult, HealthCheckResult, HealthReport, HealthStatus};
