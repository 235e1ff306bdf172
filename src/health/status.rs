//! Health status and report types.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// Aggregate health status.
///
/// Variants are ordered from worst to best, so `min` of two statuses is
/// the worse one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Not able to serve.
    Unhealthy,
    /// Serving, but with reduced capability.
    Degraded,
    /// Fully operational.
    Healthy,
}

impl HealthStatus {
    /// Returns true only for `Healthy`. The gate treats everything else as unhealthy.
    pub fn is_healthy(self) -> bool {
        self == HealthStatus::Healthy
    }

    /// The worse of two statuses.
    pub fn worst(self, other: HealthStatus) -> HealthStatus {
        self.min(other)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Unhealthy => "unhealthy",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome reported by a single health check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthCheckResult {
    pub status: HealthStatus,
    pub description: Option<String>,
}

impl HealthCheckResult {
    pub fn healthy() -> Self {
        Self {
            status: HealthStatus::Healthy,
            description: None,
        }
    }

    pub fn degraded(description: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Degraded,
            description: Some(description.into()),
        }
    }

    pub fn unhealthy(description: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            description: Some(description.into()),
        }
    }
}

/// Individual check entry in a [`HealthReport`].
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    /// Check name (e.g., "self", "database")
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Check duration in milliseconds
    pub duration_ms: u64,
}

/// Rolled-up result of every registered check.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub entries: Vec<CheckResult>,
    /// Total evaluation time in milliseconds
    pub duration_ms: u64,
}

impl HealthReport {
    /// Build a report whose status is the worst of its entries.
    /// An empty report is healthy.
    pub fn from_entries(entries: Vec<CheckResult>, duration: Duration) -> Self {
        let status = entries
            .iter()
            .map(|e| e.status)
            .fold(HealthStatus::Healthy, HealthStatus::worst);

        Self {
            status,
            entries,
            duration_ms: duration.as_millis() as u64,
        }
    }

    /// Entries that did not report healthy.
    pub fn failing(&self) -> impl Iterator<Item = &CheckResult> {
        self.entries.iter().filter(|e| !e.status.is_healthy())
    }
}
