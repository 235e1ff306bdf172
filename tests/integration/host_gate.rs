//! Host running a registry-backed gate

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tcp_health_gate::health::{self, HealthCheckRegistry, HealthCheckResult};
use tcp_health_gate::host::Host;

use crate::helpers::{can_connect, local_config, wait_until};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_readiness_toggle_opens_and_closes_port() {
    let ready = Arc::new(AtomicBool::new(true));

    let mut registry = HealthCheckRegistry::new();
    let flag = Arc::clone(&ready);
    registry
        .register(health::from_fn("self", || async { Ok(HealthCheckResult::healthy()) }))
        .register(health::from_fn("ready", move || {
            let ready = flag.load(Ordering::SeqCst);
            async move {
                if ready {
                    Ok(HealthCheckResult::healthy())
                } else {
                    Ok(HealthCheckResult::unhealthy("draining"))
                }
            }
        }));

    let mut host = Host::new();
    let gate = host
        .add_health_gate(local_config(Duration::from_millis(20)), registry)
        .unwrap();
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let running = tokio::spawn(host.run_until(async {
        let _ = stop_rx.await;
    }));

    assert!(can_connect(gate.addr).await);

    ready.store(false, Ordering::SeqCst);
    assert!(wait_until(Duration::from_secs(2), || gate.metrics.bound.get() == 0).await);
    assert!(!can_connect(gate.addr).await);

    ready.store(true, Ordering::SeqCst);
    assert!(wait_until(Duration::from_secs(2), || gate.metrics.bound.get() == 1).await);
    assert!(can_connect(gate.addr).await);

    stop_tx.send(()).unwrap();
    running.await.unwrap().unwrap();
    assert!(!can_connect(gate.addr).await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_two_gates_coexist() {
    let mut host = Host::new();
    let first = host
        .add_health_gate(local_config(Duration::from_millis(20)), HealthCheckRegistry::new())
        .unwrap();
    let second = host
        .add_health_gate(local_config(Duration::from_millis(20)), HealthCheckRegistry::new())
        .unwrap();
    assert_ne!(first.addr.port(), second.addr.port());

    let signal = host.shutdown_signal();
    let running = tokio::spawn(host.run_until(tokio::time::sleep(Duration::from_millis(100))));

    assert!(can_connect(first.addr).await);
    assert!(can_connect(second.addr).await);

    running.await.unwrap().unwrap();
    assert!(signal.is_shutdown());
    assert!(first.metrics.cycles_total.get() >= 1);
    assert!(second.metrics.cycles_total.get() >= 1);
}
