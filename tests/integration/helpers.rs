//! Test helpers and utilities

use std::collections::VecDeque;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tcp_health_gate::config::GateConfig;
use tcp_health_gate::health::{EvaluationError, HealthEvaluator, HealthStatus};
use tokio::net::TcpStream;

/// One scripted evaluation result; `Err` simulates a failing provider.
pub type Step = Result<HealthStatus, &'static str>;

/// Evaluator that replays a fixed sequence, repeating the last step forever.
#[derive(Clone)]
pub struct ScriptedEvaluator {
    steps: Arc<Mutex<VecDeque<Step>>>,
    calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl ScriptedEvaluator {
    pub fn new(steps: Vec<Step>) -> Self {
        assert!(!steps.is_empty(), "script needs at least one step");
        Self {
            steps: Arc::new(Mutex::new(steps.into())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn always(status: HealthStatus) -> Self {
        Self::new(vec![Ok(status)])
    }

    /// Number of evaluations performed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HealthEvaluator for ScriptedEvaluator {
    async fn evaluate(&self) -> Result<HealthStatus, EvaluationError> {
        let step = {
            let mut steps = self.steps.lock().unwrap();
            if steps.len() > 1 {
                steps.pop_front().unwrap()
            } else {
                *steps.front().unwrap()
            }
        };
        self.calls.fetch_add(1, Ordering::SeqCst);
        step.map_err(EvaluationError::from)
    }
}

/// Gate on 127.0.0.1 with an ephemeral port.
pub fn local_config(interval: Duration) -> GateConfig {
    GateConfig::new(0, interval)
        .expect("valid interval")
        .with_bind_addr(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

/// Probe the gate the way an orchestrator does: connect, then hang up.
pub async fn can_connect(addr: SocketAddr) -> bool {
    matches!(
        tokio::time::timeout(Duration::from_secs(1), TcpStream::connect(addr)).await,
        Ok(Ok(_))
    )
}

/// Poll `condition` every 5ms until it holds or `timeout` passes.
pub async fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}
