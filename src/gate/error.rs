//! Gate error types.

use std::fmt;
use std::io;
use std::net::SocketAddr;

/// Errors that stop a gate.
///
/// Only bind failures at startup end the gate; transient failures inside
/// the poll loop are logged and never surface here.
#[derive(Debug)]
pub enum GateError {
    /// The listener could not be bound (port in use, permission denied, ...).
    Bind { addr: SocketAddr, source: io::Error },
}

impl GateError {
    /// Check if the port is held by another socket.
    pub fn is_addr_in_use(&self) -> bool {
        matches!(self, GateError::Bind { source, .. } if source.kind() == io::ErrorKind::AddrInUse)
    }

    /// Check if binding the port requires privileges we lack.
    pub fn is_permission_denied(&self) -> bool {
        matches!(
            self,
            GateError::Bind { source, .. } if source.kind() == io::ErrorKind::PermissionDenied
        )
    }
}

impl fmt::Display for GateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateError::Bind { addr, source } => {
                write!(f, "failed to bind health gate on {}: {}", addr, source)
            }
        }
    }
}

impl std::error::Error for GateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GateError::Bind { source, .. } => Some(source),
        }
    }
}
