//! The health gate: a TCP port that is open only while the process is healthy.
//!
//! [`GateController`] runs one poll cycle per interval:
//!
//! ```text
//!   evaluate health ──▶ healthy? ──yes──▶ bind (if unbound) ──▶ drain pending probes
//!                          │
//!                          no ──▶ unbind (if bound)
//!   sleep(poll_interval) or shutdown ──▶ repeat
//! ```
//!
//! A bind failure at startup is fatal ([`GateError::Bind`]). Everything that
//! goes wrong after that is logged and retried on the next cycle.

mod controller;
mod drain;
mod error;

pub use controller::{CycleOutcome, GateController};
pub use drain::drain_pending;
pub use error::GateError;

use std::fmt;

/// Bind state of the gate listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Port is closed; probes are refused.
    Unbound,
    /// Port is open; probes connect and are closed.
    Bound,
}

impl GateState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unbound => "unbound",
            Self::Bound => "bound",
        }
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
