//! Weighted 4-connected grid graphs and shortest-path search over them.

mod error;
mod find;
mod grid;

pub use error::Error;
pub use find::{bfs, dijkstra, find_path, PathResult, Strategy};
pub use grid::{Graph, Node, NodeId, Point};
