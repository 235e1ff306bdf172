//! Gate controller: the poll-and-bind state machine.

use std::any::Any;
use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use tracing::{error, info, trace, warn};

use super::{drain_pending, GateError, GateState};
use crate::config::GateConfig;
use crate::health::{EvaluationError, HealthEvaluator, HealthStatus};
use crate::listener::ListenerHandle;
use crate::observability::GateMetrics;
use crate::shutdown::ShutdownSignal;

/// What a single poll cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Healthy: listener bound and pending probes drained.
    Drained { accepted: usize },
    /// Not healthy: listener unbound.
    Unbound { status: HealthStatus },
    /// Evaluation or socket operation failed; logged and skipped.
    Failed,
}

/// Binds and unbinds a TCP listener in step with health.
///
/// Owns its listener exclusively; cycles run sequentially on `&mut self`,
/// so no locking is involved. One controller per gate.
pub struct GateController<E> {
    config: GateConfig,
    evaluator: E,
    listener: ListenerHandle,
    metrics: Arc<GateMetrics>,
}

impl<E: HealthEvaluator> GateController<E> {
    /// Create a controller. The listener starts unbound.
    pub fn new(config: GateConfig, evaluator: E) -> Self {
        let listener = ListenerHandle::new(config.listen_addr(), config.backlog());
        Self {
            config,
            evaluator,
            listener,
            metrics: Arc::new(GateMetrics::default()),
        }
    }

    /// Record into an externally owned metrics registry.
    pub fn with_metrics(mut self, metrics: Arc<GateMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn metrics(&self) -> Arc<GateMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Current bind state, derived from the listener.
    pub fn state(&self) -> GateState {
        if self.listener.is_bound() {
            GateState::Bound
        } else {
            GateState::Unbound
        }
    }

    /// Gate address. The port is resolved once the listener has been bound.
    pub fn local_addr(&self) -> SocketAddr {
        self.listener.addr()
    }

    /// Startup bind.
    ///
    /// Failure here is fatal: a port that is taken or privileged will not
    /// fix itself between polls.
    pub fn bind(&mut self) -> Result<SocketAddr, GateError> {
        let was_bound = self.listener.is_bound();

        let addr = self.listener.bind().map_err(|source| {
            error!(
                port = self.config.port(),
                kind = ?source.kind(),
                error = %source,
                "Failed to bind health gate; the port may be taken or privileged"
            );
            GateError::Bind {
                addr: self.listener.addr(),
                source,
            }
        })?;

        if !was_bound {
            self.metrics.record_transition(GateState::Bound);
            info!(port = addr.port(), addr = %addr, "Health gate listening");
        }

        Ok(addr)
    }

    /// Run until `shutdown` fires, then unbind.
    ///
    /// Binds optimistically first (unless [`bind`](Self::bind) already
    /// ran); a bind error is returned before any cycle executes.
    pub async fn run(mut self, mut shutdown: ShutdownSignal) -> Result<(), GateError> {
        info!(
            port = self.config.port(),
            interval_ms = self.config.poll_interval().as_millis() as u64,
            "Health gate starting"
        );

        self.bind()?;

        while !shutdown.is_shutdown() {
            self.evaluate_and_apply().await;

            tokio::select! {
                _ = tokio::time::sleep(self.config.poll_interval()) => {}
                _ = shutdown.wait() => break,
            }
        }

        self.close();
        info!(port = self.listener.addr().port(), "Health gate stopped");
        Ok(())
    }

    /// Run one poll cycle: evaluate health, then bind and drain or unbind.
    ///
    /// Never fails. An evaluation error closes the gate until a fresh
    /// healthy result arrives.
    pub async fn evaluate_and_apply(&mut self) -> CycleOutcome {
        self.metrics.cycles_total.inc();

        match self.evaluate().await {
            Ok(status) if status.is_healthy() => self.open_and_drain(),
            Ok(status) => {
                self.close();
                warn!(
                    status = %status,
                    port = self.listener.addr().port(),
                    "Health status is {}, gate closed",
                    status
                );
                CycleOutcome::Unbound { status }
            }
            Err(e) => {
                self.metrics.evaluation_failures_total.inc();
                error!(
                    error = %e,
                    port = self.listener.addr().port(),
                    "Health evaluation failed, gate closed until next healthy result"
                );
                self.close();
                CycleOutcome::Failed
            }
        }
    }

    async fn evaluate(&self) -> Result<HealthStatus, EvaluationError> {
        let evaluation = AssertUnwindSafe(self.evaluator.evaluate()).catch_unwind();

        let result = match self.config.evaluation_timeout() {
            Some(limit) => tokio::time::timeout(limit, evaluation)
                .await
                .map_err(|_| EvaluationError::Timeout(limit))?,
            None => evaluation.await,
        };

        result.unwrap_or_else(|panic| Err(EvaluationError::Failed(panic_message(panic))))
    }

    fn open_and_drain(&mut self) -> CycleOutcome {
        if !self.listener.is_bound() {
            match self.listener.bind() {
                Ok(addr) => {
                    self.metrics.record_transition(GateState::Bound);
                    info!(
                        port = addr.port(),
                        status = %HealthStatus::Healthy,
                        "Health gate opened"
                    );
                }
                Err(e) => {
                    error!(
                        port = self.listener.addr().port(),
                        error = %e,
                        "Failed to rebind health gate, retrying next cycle"
                    );
                    return CycleOutcome::Failed;
                }
            }
        }

        match drain_pending(&self.listener) {
            Ok(accepted) => {
                self.metrics.probes_accepted_total.inc_by(accepted as u64);
                trace!(accepted, status = %HealthStatus::Healthy, "Probe connections drained");
                CycleOutcome::Drained { accepted }
            }
            Err(e) => {
                // Health was just confirmed, so the listener stays bound
                error!(
                    port = self.listener.addr().port(),
                    error = %e,
                    "Failed to drain probe connections"
                );
                CycleOutcome::Failed
            }
        }
    }

    fn close(&mut self) {
        if self.listener.unbind() {
            self.metrics.record_transition(GateState::Unbound);
            info!(port = self.listener.addr().port(), "Health gate closed");
        }
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("evaluator panicked: {}", detail)
}
