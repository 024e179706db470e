//! Walk on a cycle and print how the walker spreads.

use qwalk::{generators, io, quantum_walk, QwError};

fn main() -> Result<(), QwError> {
    let vertices = 16;
    let steps = 12;
    let graph = generators::cycle(vertices);
    println!("Walking on a {}-cycle from vertex 0 for {} steps", vertices, steps);

    let table = quantum_walk(&graph, 0, steps)?;

    // One bar chart line per step; the two wave fronts travel in opposite directions.
    for (t, row) in table.rows().enumerate() {
        let bars: String = row
            .iter()
            .map(|p| match (p * 10.0).round() as u32 {
                0 => '.',
                1..=2 => ':',
                3..=5 => '+',
                _ => '#',
            })
            .collect();
        println!("t={:>2} {}", t, bars);
    }
    println!("max probability {:.6}", table.max_probability());

    // Raw grid for plotting elsewhere.
    print!("{}", io::format_raw(&table));
    Ok(())
}
