use std::time::Duration;

use tracing::{error, info};

use tcp_health_gate::config::Config;
use tcp_health_gate::health::{self, HealthCheckRegistry, HealthCheckResult};
use tcp_health_gate::host::Host;
use tcp_health_gate::shutdown::ShutdownSignal;
use tcp_health_gate::{logging, BoxError, BUILD_VERSION, PKG_VERSION};

fn main() -> Result<(), BoxError> {
    let config = Config::from_env()?;

    logging::init(&config.logging)?;

    info!(
        version = PKG_VERSION,
        build = BUILD_VERSION,
        "Starting tcp_health_gate..."
    );
    config.log_summary();

    // A single task drives the gate; no need for a worker pool
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(config))
}

async fn async_main(config: Config) -> Result<(), BoxError> {
    let mut registry = HealthCheckRegistry::new();
    registry.register(health::from_fn("self", || async {
        Ok(HealthCheckResult::healthy())
    }));

    let mut host = Host::new();

    let gate = host
        .add_health_gate(config.gate.clone(), registry)
        .inspect_err(|e| error!(error = %e, "Health gate could not start"))?;
    info!(addr = %gate.addr, "Health gate registered");

    let interval = config.gate.poll_interval();
    host.spawn_service("heartbeat", move |shutdown| heartbeat(interval, shutdown));

    host.run().await
}

/// Example worker: logs once per interval until shutdown.
async fn heartbeat(interval: Duration, mut shutdown: ShutdownSignal) -> Result<(), BoxError> {
    let mut ticker = tokio::time::interval(interval);
    let mut beats: u64 = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                beats += 1;
                tracing::debug!(beats, "Worker running");
            }
            _ = shutdown.wait() => break,
        }
    }

    info!(beats, "Worker stopped");
    Ok(())
}
