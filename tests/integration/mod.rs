//! Integration tests for tcp_health_gate
//!
//! These tests bind real sockets on 127.0.0.1 with ephemeral ports and
//! probe them the way an orchestrator would: a bare TCP connect.
//!
//! Run with: cargo test --test integration

mod helpers;

mod gate_lifecycle;
mod host_gate;
