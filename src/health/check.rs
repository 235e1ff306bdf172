//! Individual health checks.

use std::future::Future;

use async_trait::async_trait;

use super::HealthCheckResult;
use crate::BoxError;

/// A single named health check.
///
/// Returning `Err` means the check itself could not run; the registry maps
/// that to the registration's failure status.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Check name used in reports and logs.
    fn name(&self) -> &str;

    /// Run the check.
    async fn check(&self) -> Result<HealthCheckResult, BoxError>;
}

/// Health check backed by an async closure. See [`from_fn`].
pub struct FnCheck<F> {
    name: String,
    f: F,
}

/// Build a health check from an async closure.
///
/// ```rust,ignore
/// let check = health::from_fn("self", || async { Ok(HealthCheckResult::healthy()) });
/// ```
pub fn from_fn<F, Fut>(name: impl Into<String>, f: F) -> FnCheck<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<HealthCheckResult, BoxError>> + Send,
{
    FnCheck {
        name: name.into(),
        f,
    }
}

#[async_trait]
impl<F, Fut> HealthCheck for FnCheck<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<HealthCheckResult, BoxError>> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self) -> Result<HealthCheckResult, BoxError> {
        (self.f)().await
    }
}
