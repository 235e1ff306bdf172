//! Listening socket owned by a health gate.
//!
//! Unlike a server listener, this one is repeatedly bound and unbound over
//! its lifetime. While unbound, nothing holds the port, so connection
//! attempts are refused by the OS.
//!
//! ```text
//!            bind()                     unbind()
//!   Unbound ───────────▶  Bound  ──────────────────▶ Unbound
//!                          │  ▲
//!                          └──┘ try_accept()
//! ```

mod tcp;

pub use tcp::{AcceptedProbe, ListenerHandle};
