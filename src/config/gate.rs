//! Health gate configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use super::parse::{env_duration, env_or, env_parse};
use super::ConfigError;

/// Default probe port (matches the conventional HTTP port probes target).
pub const DEFAULT_PORT: u16 = 80;

/// Default delay between poll cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default listen backlog, also the per-cycle drain cap.
pub const DEFAULT_BACKLOG: i32 = 128;

/// Immutable configuration for one health gate.
///
/// Built once before the gate starts and moved into the controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateConfig {
    port: u16,
    poll_interval: Duration,
    bind_addr: IpAddr,
    backlog: i32,
    evaluation_timeout: Option<Duration>,
}

impl GateConfig {
    /// Create a configuration for `port`, re-evaluated every `poll_interval`.
    ///
    /// A zero interval is rejected: the poll loop would never yield.
    pub fn new(port: u16, poll_interval: Duration) -> Result<Self, ConfigError> {
        if poll_interval.is_zero() {
            return Err(ConfigError::Invalid {
                key: "poll_interval".into(),
                message: "must be greater than zero".into(),
            });
        }

        Ok(Self {
            port,
            poll_interval,
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            backlog: DEFAULT_BACKLOG,
            evaluation_timeout: None,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// - `HEALTH_GATE_PORT` (default: 80)
    /// - `HEALTH_GATE_INTERVAL` (default: 1s)
    /// - `HEALTH_GATE_BIND_ADDR` (default: 0.0.0.0)
    /// - `HEALTH_GATE_BACKLOG` (default: 128)
    /// - `HEALTH_GATE_EVAL_TIMEOUT` (default: off)
    pub fn from_env() -> Result<Self, ConfigError> {
        let port: u16 = env_parse("HEALTH_GATE_PORT", DEFAULT_PORT)?;

        let poll_interval =
            env_duration("HEALTH_GATE_INTERVAL", "1s")?.ok_or_else(|| ConfigError::Invalid {
                key: "HEALTH_GATE_INTERVAL".into(),
                message: format!(
                    "'{}' disables polling; interval must be greater than zero",
                    env_or("HEALTH_GATE_INTERVAL", "1s")
                ),
            })?;

        let bind_addr: IpAddr =
            env_parse("HEALTH_GATE_BIND_ADDR", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?;

        let backlog: i32 = env_parse("HEALTH_GATE_BACKLOG", DEFAULT_BACKLOG)?;
        if backlog <= 0 {
            return Err(ConfigError::Invalid {
                key: "HEALTH_GATE_BACKLOG".into(),
                message: format!("{} is not a positive backlog", backlog),
            });
        }

        let evaluation_timeout = env_duration("HEALTH_GATE_EVAL_TIMEOUT", "off")?;

        Ok(Self::new(port, poll_interval)?
            .with_bind_addr(bind_addr)
            .with_backlog(backlog)
            .with_evaluation_timeout(evaluation_timeout))
    }

    /// Set the address to bind on.
    pub fn with_bind_addr(mut self, addr: IpAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the listen backlog. Values below 1 are clamped to 1.
    pub fn with_backlog(mut self, backlog: i32) -> Self {
        self.backlog = backlog.max(1);
        self
    }

    /// Bound each health evaluation. `None` waits indefinitely.
    pub fn with_evaluation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.evaluation_timeout = timeout;
        self
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn bind_addr(&self) -> IpAddr {
        self.bind_addr
    }

    pub fn backlog(&self) -> i32 {
        self.backlog
    }

    pub fn evaluation_timeout(&self) -> Option<Duration> {
        self.evaluation_timeout
    }

    /// Socket address the gate listens on.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            backlog: DEFAULT_BACKLOG,
            evaluation_timeout: None,
        }
    }
}
