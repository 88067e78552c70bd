//! Ring Topology Module
//!
//! Read model over the `chord` table the ring's nodes maintain.
//!
//! ## Core Concepts
//! - **Records**: Each row is one node and the successor it points at, so the
//!   table as a whole describes a ring.
//! - **Store**: `RingStore` reads the SQLite file through a bounded,
//!   read-only connection pool. Writes belong to the DHT nodes, never to the
//!   gateway.
//! - **Graph view**: The rows are rendered into a positional nodes + links
//!   payload; every successor reference is checked against the node set.

pub mod handlers;
pub mod store;
pub mod types;
