use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::GatewayError;

/// One row of the `chord` table.
///
/// `id` is the node's own address (column `self`), `successor` the address of
/// the next node in key-space order. A single-node ring points at itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeRecord {
    pub id: String,
    pub successor: String,
}

/// A node in the rendered topology graph.
///
/// `id` is the node's positional index in the payload, `name` its address.
/// `fixed` is a layout hint for visualization clients and is always false.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphNode {
    pub id: usize,
    pub name: String,
    pub fixed: bool,
}

/// A directed successor edge between two positional indices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphLink {
    pub source: usize,
    pub target: usize,
}

/// The payload of `GET /nodes`.
///
/// For a well-formed ring every node has exactly one outgoing link, so
/// `nodes.len() == links.len()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphResponse {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl GraphResponse {
    /// Render table rows into the graph payload.
    ///
    /// Fails with `UnknownSuccessor` when a row points at an address that is
    /// not itself a node. An empty row set yields an empty graph.
    pub fn from_records(records: &[NodeRecord]) -> Result<Self, GatewayError> {
        let index: HashMap<&str, usize> = records
            .iter()
            .enumerate()
            .map(|(i, record)| (record.id.as_str(), i))
            .collect();

        let nodes = records
            .iter()
            .enumerate()
            .map(|(i, record)| GraphNode {
                id: i,
                name: record.id.clone(),
                fixed: false,
            })
            .collect();

        let mut links = Vec::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            let target = index.get(record.successor.as_str()).ok_or_else(|| {
                GatewayError::UnknownSuccessor {
                    node: record.id.clone(),
                    successor: record.successor.clone(),
                }
            })?;
            links.push(GraphLink {
                source: i,
                target: *target,
            });
        }

        Ok(Self { nodes, links })
    }
}

/// The payload of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub nodes: u64,
}
