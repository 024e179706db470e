//! Grover-style search on a hypercube, written out as QWML.

use qwalk::io::{self, QwmlDocument};
use qwalk::{generators, WalkParametersBuilder, Walker, QwError};

fn main() -> Result<(), QwError> {
    let dimension = 6;
    let marked = 0b101_010;
    let graph = generators::hypercube(dimension)?;
    let n = graph.vertex_count();

    let params = WalkParametersBuilder::new().marked(marked).steps(40).build()?;
    println!("Running {} on a {}-dimensional hypercube ({} vertices)", params, dimension, n);
    let table = Walker::new().run(&graph, &params)?;

    // Find the step where the marked vertex is most likely.
    let (best_t, best_p) = table
        .vertex_series(marked)
        .enumerate()
        .fold((0, 0.0), |(bt, bp), (t, p)| if p > bp { (t, p) } else { (bt, bp) });
    println!("initial probability of vertex {}: {:.6}", marked, 1.0 / n as f64);
    println!("peak probability {:.6} at step {}", best_p, best_t);

    let doc = QwmlDocument::new(graph, table)?.with_comment("hypercube_search_demo");
    let path = std::env::temp_dir().join("hypercube_search.qwml");
    io::write_qwml(&path, &doc)?;
    println!("wrote {}", path.display());
    Ok(())
}
