// benches/walk_bench.rs

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use qwalk::{generators, quantum_search, quantum_walk, io};

fn benchmark_walk_runs(c: &mut Criterion) {
    c.bench_function("walk_cycle_64_x200", |b| {
        let graph = generators::cycle(64);
        b.iter(|| quantum_walk(black_box(&graph), 0, 200));
    });

    c.bench_function("search_hypercube_6_x50", |b| {
        let graph = generators::hypercube(6).expect("hypercube of dimension 6");
        b.iter(|| quantum_search(black_box(&graph), 0, 50));
    });

    c.bench_function("search_random_128_x50", |b| {
        let graph = generators::random(128, 0.1, 42).expect("valid edge probability");
        b.iter(|| quantum_search(black_box(&graph), 7, 50));
    });
}

fn benchmark_formats(c: &mut Criterion) {
    let graph = generators::complete(32);
    let table = quantum_search(&graph, 3, 100).expect("valid search");
    let doc = io::QwmlDocument::new(graph, table).expect("matching vertex counts");
    let text = doc.to_qwml_string().expect("in-memory render");

    c.bench_function("qwml_render_32x100", |b| {
        b.iter(|| black_box(&doc).to_qwml_string());
    });

    c.bench_function("qwml_parse_32x100", |b| {
        b.iter(|| io::parse_qwml(black_box(&text)));
    });
}

criterion_group!(benches, benchmark_walk_runs, benchmark_formats);
criterion_main!(benches);
