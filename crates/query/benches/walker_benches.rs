use criterion::{Criterion, black_box, criterion_group, criterion_main};
use schematree_model::{Element, SchemaNode, elem};
use schematree_query::{iter_context_items, iter_nodes, node_path};

fn build_tree(depth: usize, fanout: usize) -> Element {
    fn grow(depth: usize, fanout: usize, index: usize) -> Element {
        let mut builder = elem(&format!("n{index}"));
        if depth > 0 {
            for child_index in 0..fanout {
                builder = builder.child(grow(depth - 1, fanout, child_index));
            }
        }
        builder.build()
    }
    grow(depth, fanout, 0)
}

fn deepest(root: &Element) -> Element {
    let mut node = root.clone();
    while let Some(child) = node.child(0) {
        node = child;
    }
    node
}

fn benchmark_iter_nodes(c: &mut Criterion) {
    let tree = build_tree(4, 8);
    c.bench_function("walk/iter_nodes", |b| {
        b.iter(|| {
            let count = iter_nodes(black_box(&tree), None).count();
            black_box(count);
        })
    });
}

fn benchmark_iter_context(c: &mut Criterion) {
    let tree = build_tree(4, 8);
    c.bench_function("walk/iter_context_items", |b| {
        b.iter(|| {
            let count = iter_context_items(black_box(&tree)).count();
            black_box(count);
        })
    });
}

fn benchmark_node_path(c: &mut Criterion) {
    let tree = build_tree(6, 3);
    let target = deepest(&tree);
    c.bench_function("path/node_path_deep", |b| {
        b.iter(|| {
            let path = node_path(black_box(&target), black_box(&tree));
            black_box(path);
        })
    });
}

criterion_group!(
    benches,
    benchmark_iter_nodes,
    benchmark_iter_context,
    benchmark_node_path
);
criterion_main!(benches);
