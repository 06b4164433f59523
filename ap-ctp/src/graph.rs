//! Weather-annotated road maps.
//!
//! An undirected graph whose edges are independently traversable with a known
//! probability; the traveler starts at node 0 and wants node `n - 1`. Edge
//! statuses are tracked in 64-bit belief masks, which caps maps at 64 edges.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const MAX_EDGES: usize = 64;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("failed to read graph file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse graph YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid graph: {msg}")]
    Invalid { msg: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    /// Probability that the edge turns out traversable.
    pub prob_free: f64,
    pub cost: f64,
}

#[derive(Debug, Deserialize)]
struct GraphSpec {
    num_nodes: usize,
    edges: Vec<Edge>,
}

#[derive(Debug, Clone)]
pub struct Graph {
    num_nodes: usize,
    edges: Vec<Edge>,
    /// Edge indices incident to each node, in insertion order.
    at: Vec<Vec<usize>>,
}

impl Graph {
    pub fn new(num_nodes: usize, edges: Vec<Edge>) -> Result<Self, GraphError> {
        if num_nodes < 2 {
            return Err(GraphError::Invalid {
                msg: "a map needs at least a start and a goal node".into(),
            });
        }
        if edges.len() > MAX_EDGES {
            return Err(GraphError::Invalid {
                msg: format!("at most {} edges are supported, got {}", MAX_EDGES, edges.len()),
            });
        }
        for (i, e) in edges.iter().enumerate() {
            if e.from >= num_nodes || e.to >= num_nodes {
                return Err(GraphError::Invalid {
                    msg: format!("edge {} endpoint out of range", i),
                });
            }
            if e.from == e.to {
                return Err(GraphError::Invalid {
                    msg: format!("edge {} is a self-loop", i),
                });
            }
            if !(e.prob_free.is_finite() && (0.0..=1.0).contains(&e.prob_free)) {
                return Err(GraphError::Invalid {
                    msg: format!("edge {} prob_free must be in [0, 1]", i),
                });
            }
            if !(e.cost.is_finite() && e.cost >= 0.0) {
                return Err(GraphError::Invalid {
                    msg: format!("edge {} cost must be finite and non-negative", i),
                });
            }
        }
        let mut at = vec![Vec::new(); num_nodes];
        for (i, e) in edges.iter().enumerate() {
            at[e.from].push(i);
            at[e.to].push(i);
        }
        Ok(Self {
            num_nodes,
            edges,
            at,
        })
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, GraphError> {
        let spec: GraphSpec = serde_yaml::from_str(yaml)?;
        Self::new(spec.num_nodes, spec.edges)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, GraphError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn edge(&self, e: usize) -> &Edge {
        &self.edges[e]
    }

    pub fn cost(&self, e: usize) -> f64 {
        self.edges[e].cost
    }

    pub fn prob_free(&self, e: usize) -> f64 {
        self.edges[e].prob_free
    }

    /// Edge indices incident to `node`; the action space at that node.
    pub fn incident(&self, node: usize) -> &[usize] {
        &self.at[node]
    }

    pub fn other_end(&self, e: usize, node: usize) -> usize {
        let edge = &self.edges[e];
        if edge.from == node {
            edge.to
        } else {
            debug_assert_eq!(edge.to, node);
            edge.from
        }
    }

    pub fn start(&self) -> usize {
        0
    }

    pub fn goal(&self) -> usize {
        self.num_nodes - 1
    }
}

/// Single-source shortest path over the edges accepted by `passable`.
/// Returns `f64::INFINITY` for unreachable nodes. Maps are small, so the
/// dense O(V^2) scan beats juggling a float-keyed heap.
pub fn min_distances(graph: &Graph, source: usize, passable: impl Fn(usize) -> bool) -> Vec<f64> {
    let n = graph.num_nodes();
    let mut dist = vec![f64::INFINITY; n];
    let mut done = vec![false; n];
    dist[source] = 0.0;
    loop {
        let mut u = None;
        let mut best = f64::INFINITY;
        for v in 0..n {
            if !done[v] && dist[v] < best {
                best = dist[v];
                u = Some(v);
            }
        }
        let Some(u) = u else { break };
        done[u] = true;
        for &e in graph.incident(u) {
            if !passable(e) {
                continue;
            }
            let v = graph.other_end(e, u);
            let d = dist[u] + graph.cost(e);
            if d < dist[v] {
                dist[v] = d;
            }
        }
    }
    dist
}
