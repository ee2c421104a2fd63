use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Index of a node in the graph's arena.
pub type NodeId = usize;

// the four axis-aligned offsets, (row, col); diagonals excluded
const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, -1), (0, 1)];

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: i32,
    pub col: i32,
}

impl Point {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The string identifier addressing this cell in the graph.
    pub fn id(&self) -> String {
        self.to_string()
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.row, self.col)
    }
}

impl FromStr for Point {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || Error::MalformedIdentifier(s.to_string());

        let mut tokens = s.split('_');
        let (Some(row), Some(col), None) = (tokens.next(), tokens.next(), tokens.next()) else {
            return Err(malformed());
        };
        Ok(Point {
            row: row.parse().map_err(|_| malformed())?,
            col: col.parse().map_err(|_| malformed())?,
        })
    }
}

/// One grid cell. `cost` is the price of *entering* this cell, so every
/// edge that terminates here carries it as its weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub point: Point,
    pub cost: f64,
    /// Arena indices of the adjacent nodes, parallel to `edge_weights`.
    pub neighbors: Vec<NodeId>,
    /// `edge_weights[k]` is the cost to traverse into `neighbors[k]`.
    pub edge_weights: Vec<f64>,
}

/// A 4-connected grid graph, built once and read-only afterwards.
///
/// Nodes live in an arena addressed by [`NodeId`]; the string index maps
/// each cell identifier to its arena slot. Neighbor links are arena
/// indices rather than owning references, so the node set has a single
/// owner even though adjacency is cyclic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    width: i32,
    height: i32,
    nodes: Vec<Node>,
    index: HashMap<String, NodeId>,
}

impl Graph {
    /// Build a `width` x `height` grid graph, drawing one cost per cell
    /// from `cost_source`.
    ///
    /// `cost_source` is invoked exactly once per cell, row-major (rows
    /// `0..height`, columns `0..width` within each row). Construction is
    /// two-phase: every node must exist before any wiring, otherwise a
    /// cell could not link to neighbors created after it.
    pub fn build(
        width: i32,
        height: i32,
        mut cost_source: impl FnMut() -> f64,
    ) -> Result<Self, Error> {
        if width <= 0 || height <= 0 {
            return Err(Error::InvalidGridSize { width, height });
        }

        let count = (width as usize) * (height as usize);
        let mut nodes = Vec::with_capacity(count);
        let mut index = HashMap::with_capacity(count);

        // phase 1: create and register every node
        for row in 0..height {
            for col in 0..width {
                let point = Point { row, col };
                index.insert(point.id(), nodes.len());
                nodes.push(Node {
                    point,
                    cost: cost_source(),
                    neighbors: Vec::new(),
                    edge_weights: Vec::new(),
                });
            }
        }

        // phase 2: wire each node to its in-bounds neighbors; the weight
        // of an edge is the cost of the cell it enters
        for id in 0..nodes.len() {
            let Point { row, col } = nodes[id].point;
            for (dr, dc) in DIRECTIONS {
                let neighbor = Point {
                    row: row + dr,
                    col: col + dc,
                };
                if let Some(&nid) = index.get(&neighbor.id()) {
                    let weight = nodes[nid].cost;
                    nodes[id].neighbors.push(nid);
                    nodes[id].edge_weights.push(weight);
                }
            }
        }

        debug!("built {}x{} grid graph with {} nodes", width, height, count);

        Ok(Self {
            width,
            height,
            nodes,
            index,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Look up a node by its string identifier.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&n| &self.nodes[n])
    }

    /// Resolve an identifier to its arena slot, or fail with
    /// [`Error::UnknownNode`].
    pub(crate) fn resolve(&self, id: &str) -> Result<NodeId, Error> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| Error::UnknownNode(id.to_string()))
    }

    pub(crate) fn at(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Two registered nodes with no edges between them; only reachable
    /// from tests that need a disconnected identifier namespace.
    #[cfg(test)]
    pub(crate) fn disjoint_pair(a: Point, b: Point) -> Self {
        let node = |point: Point| Node {
            point,
            cost: 1.0,
            neighbors: Vec::new(),
            edge_weights: Vec::new(),
        };
        Self {
            width: 1,
            height: 1,
            nodes: vec![node(a), node(b)],
            index: HashMap::from([(a.id(), 0), (b.id(), 1)]),
        }
    }
}
