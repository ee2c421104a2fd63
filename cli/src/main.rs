use anyhow::Context;
use gridpath::{find_path, Graph, Strategy};
use log::info;
use rand::Rng;

/// Thin host adapter around the gridpath core: builds a grid with random
/// per-cell costs and prints the path between two named cells.
///
/// Usage: cli [width] [height] [start_id] [goal_id]
fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let width: i32 = match args.first() {
        Some(s) => s.parse().context("width must be an integer")?,
        None => 10,
    };
    let height: i32 = match args.get(1) {
        Some(s) => s.parse().context("height must be an integer")?,
        None => width,
    };
    let start = args.get(2).cloned().unwrap_or_else(|| "0_0".to_string());
    let goal = args
        .get(3)
        .cloned()
        .unwrap_or_else(|| format!("{}_{}", height - 1, width - 1));

    let mut rng = rand::thread_rng();
    let graph = Graph::build(width, height, || rng.gen::<f64>())?;
    info!(
        "built {}x{} graph with {} nodes, querying {} -> {}",
        width,
        height,
        graph.len(),
        start,
        goal
    );

    for strategy in [Strategy::Dijkstra, Strategy::BreadthFirst] {
        let result = find_path(&graph, &start, &goal, strategy)?;
        println!(
            "{:?}: {} (total cost {:.3})",
            strategy,
            result.path.join(" -> "),
            result.total_cost
        );
    }

    Ok(())
}
