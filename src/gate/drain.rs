//! Probe drain: accept queued connections and close them unread.

use std::io;

use tracing::trace;

use crate::listener::ListenerHandle;

/// Accept and close every connection already queued on `listener`.
///
/// Never waits for new connections. At most `backlog` connections are
/// taken per call so a connect flood cannot hold up the poll loop.
/// An unbound listener has nothing pending and yields `Ok(0)`.
///
/// Returns the number of probes closed.
pub fn drain_pending(listener: &ListenerHandle) -> io::Result<usize> {
    let mut accepted = 0;

    for _ in 0..listener.backlog() {
        match listener.try_accept() {
            Ok(Some(probe)) => {
                // Closing without reading is the whole probe protocol
                drop(probe.socket);
                accepted += 1;
                trace!(peer = ?probe.peer, "Probe connection closed");
            }
            Ok(None) => break,
            Err(e) if is_per_connection_error(&e) => {
                trace!(error = %e, "Probe connection dropped before accept");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(accepted)
}

/// Accept errors caused by a single client, not by the listener.
fn is_per_connection_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::Interrupted
    )
}
