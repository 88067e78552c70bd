//! Chord Ring Gateway Library
//!
//! This library crate defines the core modules that make up the gateway.
//! It serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! The gateway fronts an externally-managed Chord ring and is composed of
//! three loosely coupled subsystems:
//!
//! - **`ring`**: The topology read model. Reads the `chord` table of the
//!   SQLite file the ring's nodes maintain and renders it as a graph payload
//!   (nodes + links) for visualization clients.
//! - **`dht`**: The operations layer. Invokes the external get/put client
//!   programs against the ring's entry node and relays their captured output.
//! - **`error`**: The gateway-wide error taxonomy and its mapping onto HTTP
//!   status codes.

pub mod dht;
pub mod error;
pub mod ring;
