//! Gate controller lifecycle against real sockets

use std::time::Duration;

use tcp_health_gate::gate::{GateController, GateState};
use tcp_health_gate::health::HealthStatus::{Degraded, Healthy, Unhealthy};
use tcp_health_gate::shutdown::shutdown_channel;
use tokio::time::{sleep_until, Instant};

use crate::helpers::{can_connect, local_config, wait_until, ScriptedEvaluator};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_probe_follows_health_sequence() {
    let evaluator =
        ScriptedEvaluator::new(vec![Ok(Healthy), Ok(Healthy), Ok(Unhealthy), Ok(Healthy)]);
    let mut controller = GateController::new(local_config(Duration::from_millis(100)), evaluator);
    let addr = controller.bind().unwrap();
    let (shutdown, signal) = shutdown_channel();

    let start = Instant::now();
    let task = tokio::spawn(controller.run(signal));

    sleep_until(start + Duration::from_millis(50)).await;
    assert!(can_connect(addr).await, "healthy at t=50ms");

    sleep_until(start + Duration::from_millis(250)).await;
    assert!(!can_connect(addr).await, "unhealthy at t=250ms");

    sleep_until(start + Duration::from_millis(450)).await;
    assert!(can_connect(addr).await, "healthy again at t=450ms");

    shutdown.shutdown();
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_bind_failure_prevents_poll_loop() {
    let occupier = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = occupier.local_addr().unwrap().port();
    let config = tcp_health_gate::GateConfig::new(port, Duration::from_millis(20))
        .unwrap()
        .with_bind_addr("127.0.0.1".parse().unwrap());

    let evaluator = ScriptedEvaluator::always(Healthy);
    let controller = GateController::new(config, evaluator.clone());
    let (_shutdown, signal) = shutdown_channel();

    let result = tokio::time::timeout(Duration::from_secs(1), controller.run(signal))
        .await
        .expect("bind failure must return immediately");

    let err = result.unwrap_err();
    assert!(err.is_addr_in_use());
    assert!(err.to_string().contains(&port.to_string()));
    assert_eq!(evaluator.calls(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_evaluation_failure_does_not_stop_loop() {
    let evaluator =
        ScriptedEvaluator::new(vec![Ok(Healthy), Err("provider offline"), Ok(Healthy)]);
    let mut controller =
        GateController::new(local_config(Duration::from_millis(30)), evaluator.clone());
    let addr = controller.bind().unwrap();
    let metrics = controller.metrics();
    let (shutdown, signal) = shutdown_channel();

    let task = tokio::spawn(controller.run(signal));

    // The failure is call 2; at least two more cycles must follow it
    assert!(wait_until(Duration::from_secs(2), || evaluator.calls() >= 4).await);
    assert!(!task.is_finished());
    assert_eq!(metrics.evaluation_failures_total.get(), 1);
    assert!(can_connect(addr).await);

    shutdown.shutdown();
    task.await.unwrap().unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unbound_stays_refused_until_healthy() {
    let evaluator = ScriptedEvaluator::new(vec![Ok(Healthy), Ok(Degraded)]);
    let mut controller =
        GateController::new(local_config(Duration::from_millis(20)), evaluator.clone());
    let addr = controller.bind().unwrap();
    let metrics = controller.metrics();
    let (shutdown, signal) = shutdown_channel();

    let task = tokio::spawn(controller.run(signal));

    assert!(wait_until(Duration::from_secs(2), || evaluator.calls() >= 2).await);
    for _ in 0..3 {
        assert!(!can_connect(addr).await);
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    assert_eq!(metrics.bound.get(), 0);
    assert_eq!(metrics.transitions(GateState::Bound), 1);

    shutdown.shutdown();
    task.await.unwrap().unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_probes_are_drained() {
    let evaluator = ScriptedEvaluator::always(Healthy);
    let mut controller = GateController::new(local_config(Duration::from_millis(20)), evaluator);
    let addr = controller.bind().unwrap();
    let metrics = controller.metrics();
    let (shutdown, signal) = shutdown_channel();

    let task = tokio::spawn(controller.run(signal));

    for _ in 0..5 {
        assert!(can_connect(addr).await);
    }
    assert!(
        wait_until(Duration::from_secs(2), || metrics.probes_accepted_total.get() >= 5).await
    );

    shutdown.shutdown();
    task.await.unwrap().unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_shutdown_unbinds_within_interval() {
    let interval = Duration::from_millis(500);
    let evaluator = ScriptedEvaluator::always(Healthy);
    let mut controller = GateController::new(local_config(interval), evaluator.clone());
    let addr = controller.bind().unwrap();
    let (shutdown, signal) = shutdown_channel();

    let task = tokio::spawn(controller.run(signal));
    assert!(wait_until(Duration::from_secs(2), || evaluator.calls() >= 1).await);
    assert!(can_connect(addr).await);

    shutdown.shutdown();
    let result = tokio::time::timeout(interval, task)
        .await
        .expect("gate should stop within one poll interval");
    assert!(result.unwrap().is_ok());
    assert!(!can_connect(addr).await);
    assert_eq!(evaluator.calls(), 1);
}

#[tokio::test]
async fn test_dropped_shutdown_controller_stops_gate() {
    let interval = Duration::from_secs(1);
    let evaluator = ScriptedEvaluator::always(Healthy);
    let mut controller = GateController::new(local_config(interval), evaluator.clone());
    let addr = controller.bind().unwrap();
    let (shutdown, signal) = shutdown_channel();
    drop(shutdown);

    let task = tokio::spawn(controller.run(signal));
    let result = tokio::time::timeout(interval, task)
        .await
        .expect("gate should stop within one poll interval");
    assert!(result.unwrap().is_ok());
    assert!(!can_connect(addr).await);
    assert!(evaluator.calls() <= 1);
}
