//! Health evaluator abstraction consumed by the gate.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::HealthStatus;
use crate::BoxError;

/// Errors produced while evaluating health.
///
/// These are distinct from a non-healthy status: an error means no fresh
/// status is available at all.
#[derive(Debug)]
pub enum EvaluationError {
    /// The evaluator failed with a message.
    Failed(String),
    /// The evaluation did not finish in time.
    Timeout(Duration),
    /// The evaluator failed with an underlying error.
    Source(BoxError),
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationError::Failed(msg) => write!(f, "health evaluation failed: {}", msg),
            EvaluationError::Timeout(after) => {
                write!(f, "health evaluation timed out after {}ms", after.as_millis())
            }
            EvaluationError::Source(e) => write!(f, "health evaluation failed: {}", e),
        }
    }
}

impl std::error::Error for EvaluationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EvaluationError::Source(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<String> for EvaluationError {
    fn from(msg: String) -> Self {
        EvaluationError::Failed(msg)
    }
}

impl From<&str> for EvaluationError {
    fn from(msg: &str) -> Self {
        EvaluationError::Failed(msg.to_string())
    }
}

/// Produces the aggregate health status the gate acts on.
///
/// Called once per poll cycle, never concurrently with itself for the
/// same gate.
#[async_trait]
pub trait HealthEvaluator: Send + Sync {
    /// Evaluate current health.
    async fn evaluate(&self) -> Result<HealthStatus, EvaluationError>;
}

#[async_trait]
impl<T: HealthEvaluator + ?Sized> HealthEvaluator for Arc<T> {
    async fn evaluate(&self) -> Result<HealthStatus, EvaluationError> {
        (**self).evaluate().await
    }
}
