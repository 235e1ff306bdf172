//! Registry that aggregates individual health checks.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures_util::future::join_all;
use tracing::debug;

use super::{
    CheckResult, EvaluationError, HealthCheck, HealthEvaluator, HealthReport, HealthStatus,
};

#[derive(Clone)]
struct Registration {
    check: Arc<dyn HealthCheck>,
    failure_status: HealthStatus,
    timeout: Option<Duration>,
}

impl Registration {
    async fn run(&self) -> CheckResult {
        let start = Instant::now();

        let outcome = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, self.check.check()).await {
                Ok(result) => result,
                Err(_) => Err(format!("timed out after {}ms", limit.as_millis()).into()),
            },
            None => self.check.check().await,
        };

        let (status, description) = match outcome {
            Ok(result) => (result.status, result.description),
            Err(e) => {
                debug!(check = self.check.name(), error = %e, "Health check raised an error");
                (self.failure_status, Some(e.to_string()))
            }
        };

        CheckResult {
            name: self.check.name().to_string(),
            status,
            description,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// Collection of registered health checks.
///
/// Evaluating the registry runs every check concurrently and reports the
/// worst status. An empty registry reports healthy.
#[derive(Clone, Default)]
pub struct HealthCheckRegistry {
    registrations: Vec<Registration>,
}

impl HealthCheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a check that reports `Unhealthy` if it errors, with no timeout.
    pub fn register<C: HealthCheck + 'static>(&mut self, check: C) -> &mut Self {
        self.register_with(check, HealthStatus::Unhealthy, None)
    }

    /// Register a check with an explicit failure status and timeout.
    ///
    /// `failure_status` is reported when the check errors or exceeds `timeout`.
    pub fn register_with<C: HealthCheck + 'static>(
        &mut self,
        check: C,
        failure_status: HealthStatus,
        timeout: Option<Duration>,
    ) -> &mut Self {
        self.registrations.push(Registration {
            check: Arc::new(check),
            failure_status,
            timeout,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Run all checks and build a report.
    pub async fn check_health(&self) -> HealthReport {
        let start = Instant::now();
        let entries = join_all(self.registrations.iter().map(|r| r.run())).await;
        HealthReport::from_entries(entries, start.elapsed())
    }
}

#[async_trait]
impl HealthEvaluator for HealthCheckRegistry {
    async fn evaluate(&self) -> Result<HealthStatus, EvaluationError> {
        let report = self.check_health().await;

        for entry in report.failing() {
            debug!(
                check = %entry.name,
                status = %entry.status,
                description = entry.description.as_deref().unwrap_or(""),
                "Health check not healthy"
            );
        }

        Ok(report.status)
    }
}
