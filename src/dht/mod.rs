//! DHT Operations Module
//!
//! The gateway does not speak the ring's RPC protocol itself; the lookup and
//! store logic lives in two external client programs. This module owns that
//! process boundary.
//!
//! ## Core Concepts
//! - **Contract**: `<get-bin> <entry-node> <key>` and
//!   `<put-bin> <entry-node> <key> <value>`; the result arrives on stdout.
//! - **Isolation**: Arguments are passed as an argv vector, never through a
//!   shell, and are validated before any process is spawned.
//! - **Bounds**: Every invocation runs under a timeout; the child is killed
//!   when the deadline passes.

pub mod handlers;
pub mod runner;
pub mod types;

#[cfg(test)]
mod tests;
