use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, VecDeque};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::grid::{Graph, NodeId};

/// Which search [`find_path`] runs for a query.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Strategy {
    /// Minimum hop count, edge weights ignored.
    BreadthFirst,
    /// Minimum cumulative edge weight.
    Dijkstra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    /// Identifiers from start to goal inclusive, length >= 1.
    pub path: Vec<String>,
    pub start: String,
    pub goal: String,
    /// Sum of the weights of the traversed edges.
    pub total_cost: f64,
}

/// Find a path between two named cells of `graph`.
///
/// Fails with [`Error::UnknownNode`] if either identifier is absent and
/// with [`Error::NoPathFound`] if the goal is unreachable from the start.
pub fn find_path(
    graph: &Graph,
    start: &str,
    goal: &str,
    strategy: Strategy,
) -> Result<PathResult, Error> {
    match strategy {
        Strategy::BreadthFirst => bfs(graph, start, goal),
        Strategy::Dijkstra => dijkstra(graph, start, goal),
    }
}

/// The entries in the priority frontier.
///
/// `seq` is a per-search insertion counter: entries of equal cost pop in
/// first-in-first-out order, which makes tie-breaking deterministic.
#[derive(Debug)]
struct ToVisit {
    cost: f64,
    node: NodeId,
    seq: u64,
}

impl Ord for ToVisit {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // reverse for BinaryHeap to be a min-heap; costs are finite and
        // non-negative, so partial_cmp never actually falls through
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for ToVisit {
    fn partial_cmp(&self, other: &ToVisit) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ToVisit {
    fn eq(&self, other: &ToVisit) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ToVisit {}

/// Breadth-first search: minimum hop count, edge weights ignored.
///
/// The predecessor of a node is the node that first discovered it. The
/// loop stops when the goal is *dequeued*, not when it is enqueued;
/// stopping on enqueue could record a suboptimal predecessor when
/// several frontier nodes discover the goal in the same layer.
pub fn bfs(graph: &Graph, start: &str, goal: &str) -> Result<PathResult, Error> {
    let start_id = graph.resolve(start)?;
    let goal_id = graph.resolve(goal)?;
    if start_id == goal_id {
        return Ok(trivial(graph, start_id));
    }

    let mut frontier: VecDeque<NodeId> = VecDeque::new();
    frontier.push_back(start_id);
    let mut came_from: HashMap<NodeId, NodeId> = HashMap::new();
    let mut discovered = vec![false; graph.len()];
    discovered[start_id] = true;

    while let Some(current) = frontier.pop_front() {
        if current == goal_id {
            break;
        }
        for &next in &graph.at(current).neighbors {
            if !discovered[next] {
                discovered[next] = true;
                came_from.insert(next, current);
                frontier.push_back(next);
            }
        }
    }

    let path = reconstruct(graph, &came_from, start_id, goal_id)?;
    Ok(into_result(graph, path))
}

/// Dijkstra search: minimum cumulative edge weight.
///
/// The frontier is a lazy-deletion priority queue: relaxing a node may
/// push a duplicate entry at a lower cost instead of re-prioritizing the
/// old one, so entries for already finalized nodes linger with stale
/// priorities and are skipped when popped.
pub fn dijkstra(graph: &Graph, start: &str, goal: &str) -> Result<PathResult, Error> {
    let start_id = graph.resolve(start)?;
    let goal_id = graph.resolve(goal)?;
    if start_id == goal_id {
        return Ok(trivial(graph, start_id));
    }

    let mut frontier: BinaryHeap<ToVisit> = BinaryHeap::new();
    let mut seq = 0;
    frontier.push(ToVisit {
        cost: 0.0,
        node: start_id,
        seq,
    });
    let mut came_from: HashMap<NodeId, NodeId> = HashMap::new();
    let mut cost_so_far: HashMap<NodeId, f64> = HashMap::from([(start_id, 0.0)]);
    let mut finalized = vec![false; graph.len()];

    while let Some(visit) = frontier.pop() {
        let current = visit.node;
        if finalized[current] {
            continue;
        }
        finalized[current] = true;

        if current == goal_id {
            debug!("reached {} at cost {}", goal, visit.cost);
            break;
        }

        let node = graph.at(current);
        let current_cost = visit.cost;
        for (k, &next) in node.neighbors.iter().enumerate() {
            let new_cost = current_cost + node.edge_weights[k];
            match cost_so_far.get(&next) {
                Some(&best) if new_cost >= best => {}
                _ => {
                    cost_so_far.insert(next, new_cost);
                    came_from.insert(next, current);
                    seq += 1;
                    frontier.push(ToVisit {
                        cost: new_cost,
                        node: next,
                        seq,
                    });
                }
            }
        }
    }

    let path = reconstruct(graph, &came_from, start_id, goal_id)?;
    Ok(into_result(graph, path))
}

/// Walk the predecessor map backward from `goal` to `start` and reverse
/// the collected nodes into start-to-goal order.
///
/// A node without a predecessor entry before `start` is reached means
/// the search never discovered the goal, which surfaces as
/// [`Error::NoPathFound`] instead of a bad lookup or an endless walk.
fn reconstruct(
    graph: &Graph,
    came_from: &HashMap<NodeId, NodeId>,
    start_id: NodeId,
    goal_id: NodeId,
) -> Result<Vec<NodeId>, Error> {
    let mut path = vec![goal_id];
    let mut current = goal_id;
    while current != start_id {
        match came_from.get(&current) {
            Some(&previous) => {
                path.push(previous);
                current = previous;
            }
            None => {
                return Err(Error::NoPathFound {
                    start: graph.at(start_id).point.id(),
                    goal: graph.at(goal_id).point.id(),
                })
            }
        }
    }
    path.reverse();
    Ok(path)
}

fn trivial(graph: &Graph, node: NodeId) -> PathResult {
    let id = graph.at(node).point.id();
    PathResult {
        path: vec![id.clone()],
        start: id.clone(),
        goal: id,
        total_cost: 0.0,
    }
}

fn into_result(graph: &Graph, path: Vec<NodeId>) -> PathResult {
    // the weight of every edge equals the cost of the node it enters, so
    // the path cost is the cost of every node past the start
    let total_cost = path[1..].iter().map(|&id| graph.at(id).cost).sum();
    let ids: Vec<String> = path.iter().map(|&id| graph.at(id).point.id()).collect();
    PathResult {
        start: ids[0].clone(),
        goal: ids[ids.len() - 1].clone(),
        path: ids,
        total_cost,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::grid::Point;

    /// Build a graph whose cells take their costs row-major from `costs`.
    fn graph_with_costs(width: i32, height: i32, costs: &[f64]) -> Graph {
        let mut remaining = costs.iter().copied();
        Graph::build(width, height, move || remaining.next().unwrap()).unwrap()
    }

    #[test]
    fn test_three_by_one_scenario() {
        let graph = graph_with_costs(3, 1, &[1.0, 5.0, 1.0]);

        let result = dijkstra(&graph, "0_0", "0_2").unwrap();
        assert_eq!(result.path, vec!["0_0", "0_1", "0_2"]);
        assert_eq!(result.total_cost, 6.0);

        // the only 2-hop route, so BFS agrees
        let result = bfs(&graph, "0_0", "0_2").unwrap();
        assert_eq!(result.path, vec!["0_0", "0_1", "0_2"]);
        assert_eq!(result.total_cost, 6.0);
    }

    #[test]
    fn test_two_by_two_corner_to_corner() {
        let graph = graph_with_costs(2, 2, &[1.0; 4]);
        for strategy in [Strategy::BreadthFirst, Strategy::Dijkstra] {
            let result = find_path(&graph, "0_0", "1_1", strategy).unwrap();
            assert_eq!(result.path.len(), 3);
            assert_eq!(result.total_cost, 2.0);
            assert_eq!(result.start, "0_0");
            assert_eq!(result.goal, "1_1");
        }
    }

    #[test]
    fn test_start_equals_goal() {
        let graph = graph_with_costs(3, 3, &[1.0; 9]);
        for strategy in [Strategy::BreadthFirst, Strategy::Dijkstra] {
            let result = find_path(&graph, "1_1", "1_1", strategy).unwrap();
            assert_eq!(result.path, vec!["1_1"]);
            assert_eq!(result.total_cost, 0.0);
        }
    }

    #[test]
    fn test_unknown_node() {
        let graph = graph_with_costs(2, 2, &[1.0; 4]);
        assert_eq!(
            bfs(&graph, "9_9", "0_0"),
            Err(Error::UnknownNode("9_9".to_string()))
        );
        assert_eq!(
            dijkstra(&graph, "0_0", "5_0"),
            Err(Error::UnknownNode("5_0".to_string()))
        );
    }

    #[test]
    fn test_equal_costs_match_bfs_hop_count() {
        let graph = graph_with_costs(5, 5, &[1.0; 25]);
        let weighted = dijkstra(&graph, "0_0", "4_4").unwrap();
        let unweighted = bfs(&graph, "0_0", "4_4").unwrap();
        assert_eq!(weighted.path.len(), 9);
        assert_eq!(unweighted.path.len(), 9);
        assert_eq!(weighted.total_cost, 8.0);
    }

    #[test]
    fn test_dijkstra_detours_around_expensive_cells() {
        // middle column of the top two rows is expensive; the cheap way
        // from 0_0 to 0_2 goes down, across the bottom row and back up
        #[rustfmt::skip]
        let costs = [
            1.0, 100.0, 1.0,
            1.0, 100.0, 1.0,
            1.0,   1.0, 1.0,
        ];
        let graph = graph_with_costs(3, 3, &costs);

        let direct = bfs(&graph, "0_0", "0_2").unwrap();
        assert_eq!(direct.path.len(), 3);
        assert_eq!(direct.total_cost, 101.0);

        let detour = dijkstra(&graph, "0_0", "0_2").unwrap();
        assert_eq!(
            detour.path,
            vec!["0_0", "1_0", "2_0", "2_1", "2_2", "1_2", "0_2"]
        );
        assert_eq!(detour.total_cost, 6.0);
    }

    #[test]
    fn test_dijkstra_is_deterministic_under_ties() {
        // every cost equal, so the frontier is full of equal priorities
        let graph = graph_with_costs(6, 6, &[1.0; 36]);
        let first = dijkstra(&graph, "0_0", "5_5").unwrap();
        let second = dijkstra(&graph, "0_0", "5_5").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unreachable_goal() {
        let graph = Graph::disjoint_pair(Point::new(0, 0), Point::new(5, 5));
        let expected = Err(Error::NoPathFound {
            start: "0_0".to_string(),
            goal: "5_5".to_string(),
        });
        assert_eq!(bfs(&graph, "0_0", "5_5"), expected);
        assert_eq!(dijkstra(&graph, "0_0", "5_5"), expected);
    }
}
