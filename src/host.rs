//! Host that runs the health gate alongside other long-running services.
//!
//! Every service receives a [`ShutdownSignal`]. The host stops when its stop
//! future completes or when any service fails, then broadcasts shutdown and
//! waits for all services to finish.
//!
//! ```rust,ignore
//! let mut host = Host::new();
//! host.add_health_gate(config.gate.clone(), registry)?;
//! host.spawn_service("worker", |shutdown| worker(shutdown));
//! host.run().await?;
//! ```

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::task::{JoinError, JoinSet};
use tracing::{error, info};

use crate::config::GateConfig;
use crate::gate::{GateController, GateError};
use crate::health::HealthEvaluator;
use crate::observability::GateMetrics;
use crate::shutdown::{shutdown_channel, wait_for_signal, ShutdownController, ShutdownSignal};
use crate::BoxError;

type ServiceExit = (&'static str, Result<(), BoxError>);

/// A gate registered with a [`Host`].
pub struct GateRegistration {
    /// Address the gate is bound to.
    pub addr: SocketAddr,
    /// The gate's metrics.
    pub metrics: Arc<GateMetrics>,
}

/// Owner of a set of shutdown-coordinated services.
pub struct Host {
    shutdown: ShutdownController,
    tasks: JoinSet<ServiceExit>,
}

impl Host {
    pub fn new() -> Self {
        let (shutdown, _) = shutdown_channel();
        Self {
            shutdown,
            tasks: JoinSet::new(),
        }
    }

    /// A signal that fires when the host begins shutting down.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Number of services still running.
    pub fn service_count(&self) -> usize {
        self.tasks.len()
    }

    /// Spawn a service. It should return once its signal fires.
    ///
    /// A service returning `Err` stops the whole host.
    pub fn spawn_service<F, Fut>(&mut self, name: &'static str, service: F)
    where
        F: FnOnce(ShutdownSignal) -> Fut,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        let running = service(self.shutdown.signal());
        info!(service = name, "Service starting");
        self.tasks.spawn(async move { (name, running.await) });
    }

    /// Register a health gate.
    ///
    /// The listener is bound before this returns, so a port conflict is
    /// reported here and not from inside the running host.
    pub fn add_health_gate<E>(
        &mut self,
        config: GateConfig,
        evaluator: E,
    ) -> Result<GateRegistration, GateError>
    where
        E: HealthEvaluator + 'static,
    {
        let mut controller = GateController::new(config, evaluator);
        let addr = controller.bind()?;
        let metrics = controller.metrics();

        self.spawn_service("health_gate", move |shutdown| async move {
            controller.run(shutdown).await.map_err(BoxError::from)
        });

        Ok(GateRegistration { addr, metrics })
    }

    /// Run until SIGTERM/SIGINT or a service failure.
    pub async fn run(self) -> Result<(), BoxError> {
        self.run_until(async {
            if let Err(e) = wait_for_signal().await {
                error!(error = %e, "Failed to register signal handlers, stopping host");
            }
        })
        .await
    }

    /// Run until `stop` completes or a service fails.
    ///
    /// Returns the first service error, if any.
    pub async fn run_until<F>(mut self, stop: F) -> Result<(), BoxError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(stop);
        let mut first_error: Option<BoxError> = None;

        loop {
            tokio::select! {
                _ = &mut stop => {
                    info!("Stop requested, shutting down host");
                    break;
                }
                Some(exit) = self.tasks.join_next(), if !self.tasks.is_empty() => {
                    if let Err(e) = service_result(exit) {
                        first_error = Some(e);
                        break;
                    }
                }
            }
        }

        self.shutdown.shutdown();

        while let Some(exit) = self.tasks.join_next().await {
            if let Err(e) = service_result(exit) {
                first_error.get_or_insert(e);
            }
        }

        info!("Host stopped");
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}

fn service_result(exit: Result<ServiceExit, JoinError>) -> Result<(), BoxError> {
    match exit {
        Ok((name, Ok(()))) => {
            info!(service = name, "Service stopped");
            Ok(())
        }
        Ok((name, Err(e))) => {
            error!(service = name, error = %e, "Service failed");
            Err(e)
        }
        Err(e) => {
            error!(error = %e, "Service task aborted");
            Err(Box::new(e))
        }
    }
}
