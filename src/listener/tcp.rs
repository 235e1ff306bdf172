//! TCP listener with explicit bind/unbind lifecycle.

use std::io;
use std::net::SocketAddr;

use socket2::{Domain, Protocol, Socket, Type};

/// A connection taken off the accept queue.
pub struct AcceptedProbe {
    pub socket: Socket,
    pub peer: Option<SocketAddr>,
}

/// Bindable TCP listening socket.
///
/// Holds at most one OS socket. The socket is non-blocking so
/// [`try_accept`](Self::try_accept) only returns connections that are
/// already queued.
pub struct ListenerHandle {
    addr: SocketAddr,
    backlog: i32,
    socket: Option<Socket>,
}

impl ListenerHandle {
    /// Create an unbound handle for `addr`.
    ///
    /// With port 0 the first bind picks an ephemeral port, and every later
    /// rebind reuses it.
    pub fn new(addr: SocketAddr, backlog: i32) -> Self {
        Self {
            addr,
            backlog: backlog.max(1),
            socket: None,
        }
    }

    /// Address this handle binds to. Reflects the resolved port after the first bind.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn backlog(&self) -> i32 {
        self.backlog
    }

    pub fn is_bound(&self) -> bool {
        self.socket.is_some()
    }

    /// Local address while bound.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.socket
            .as_ref()
            .and_then(|s| s.local_addr().ok())
            .and_then(|a| a.as_socket())
    }

    /// Bind and start listening. No-op when already bound.
    pub fn bind(&mut self) -> io::Result<SocketAddr> {
        if let Some(addr) = self.local_addr() {
            return Ok(addr);
        }

        let socket = create_listener(self.addr, self.backlog)?;
        let local = socket
            .local_addr()?
            .as_socket()
            .ok_or_else(|| io::Error::other("listener has no inet address"))?;

        self.addr = local;
        self.socket = Some(socket);
        Ok(local)
    }

    /// Close the listening socket. Returns true if it was bound.
    ///
    /// Connections still in the accept queue are reset by the OS.
    pub fn unbind(&mut self) -> bool {
        self.socket.take().is_some()
    }

    /// Accept one queued connection without waiting.
    ///
    /// Returns `Ok(None)` when nothing is queued or the handle is unbound.
    pub fn try_accept(&self) -> io::Result<Option<AcceptedProbe>> {
        let Some(socket) = self.socket.as_ref() else {
            return Ok(None);
        };

        match socket.accept() {
            Ok((socket, peer)) => Ok(Some(AcceptedProbe {
                socket,
                peer: peer.as_socket(),
            })),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Creates a non-blocking listening socket.
fn create_listener(addr: SocketAddr, backlog: i32) -> io::Result<Socket> {
    let domain = if addr.is_ipv6() {
        Domain::IPV6
    } else {
        Domain::IPV4
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    // Closed probe connections linger in TIME_WAIT; without SO_REUSEADDR the
    // rebind after an unhealthy period would fail with EADDRINUSE.
    // Not set on Windows, where it would let us steal a port in use.
    #[cfg(unix)]
    socket.set_reuse_address(true)?;

    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(backlog)?;

    Ok(socket)
}
