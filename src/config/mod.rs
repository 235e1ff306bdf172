//! Configuration module for tcp_health_gate.
//!
//! This module provides centralized configuration loading from environment variables.
//!
//! # Example
//!
//! ```rust,ignore
//! use tcp_health_gate::config::Config;
//!
//! let config = Config::from_env()?;
//! println!("Gate address: {}", config.gate.listen_addr());
//! ```

mod error;
mod gate;
mod logging;
mod parse;

pub use error::ConfigError;
pub use gate::{GateConfig, DEFAULT_BACKLOG, DEFAULT_POLL_INTERVAL, DEFAULT_PORT};
pub use logging::{LogFormat, LoggingConfig};
pub use parse::parse_duration;

/// Complete application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Health gate configuration.
    pub gate: GateConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            gate: GateConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }

    /// Print configuration summary to log.
    pub fn log_summary(&self) {
        use tracing::info;

        info!("Configuration loaded:");
        info!("  Listen: {}", self.gate.listen_addr());
        info!("  Poll interval: {:?}", self.gate.poll_interval());
        info!("  Backlog: {}", self.gate.backlog());

        match self.gate.evaluation_timeout() {
            Some(timeout) => info!("  Evaluation timeout: {:?}", timeout),
            None => info!("  Evaluation timeout: disabled"),
        }

        info!("  Log format: {:?}", self.logging.format);
    }
}
