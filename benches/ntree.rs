use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ntree::{Depth, Filter, NodeIndex, Order, TraverseOptions, Tree};

/// Builds a complete tree with `fanout` children per inner node and `levels` levels.
fn make_complete_tree(fanout: usize, levels: usize) -> (Tree<usize>, NodeIndex) {
    let mut tree = Tree::new();
    let root = tree.add_node(0);
    let mut frontier = vec![root];

    for _ in 1..levels {
        let mut next = Vec::with_capacity(frontier.len() * fanout);
        for &parent in &frontier {
            for _ in 0..fanout {
                let child = tree.add_node(tree.len());
                tree.append_child(parent, child).unwrap();
                next.push(child);
            }
        }
        frontier = next;
    }

    (tree, root)
}

fn bench_make_tree(c: &mut Criterion) {
    let mut g = c.benchmark_group("tree creation");

    for levels in [1, 4, 7] {
        g.bench_with_input(
            BenchmarkId::new("make_complete_tree", levels),
            &levels,
            |b, levels| b.iter(|| black_box(make_complete_tree(4, *levels))),
        );
    }
}

fn bench_traverse(c: &mut Criterion) {
    let mut g = c.benchmark_group("tree traversal");
    let (tree, root) = make_complete_tree(4, 8);

    for order in [Order::PreOrder, Order::InOrder, Order::PostOrder] {
        g.bench_with_input(
            BenchmarkId::new("sum_values", format!("{order:?}")),
            &order,
            |b, order| {
                let options = TraverseOptions::default().with_order(*order);
                b.iter(|| {
                    let mut sum = 0;
                    tree.traverse(root, &options, |node| {
                        sum += *node.value();
                        false
                    });
                    black_box(sum)
                })
            },
        );
    }

    g.bench_function("count_leaves", |b| {
        b.iter(|| black_box(tree.node_count(root, Filter::Leaves)))
    });

    g.bench_function("find_last_leaf", |b| {
        let target = tree.len() - 1;
        b.iter(|| black_box(tree.find(root, Order::PreOrder, Filter::Leaves, &target)))
    });

    g.bench_function("depth_limited_pre_order", |b| {
        let options = TraverseOptions::default().with_depth(Depth::limited(4).unwrap());
        b.iter(|| {
            let mut visits = 0usize;
            tree.traverse(root, &options, |_| {
                visits += 1;
                false
            });
            black_box(visits)
        })
    });
}

criterion_group!(benches, bench_make_tree, bench_traverse);
criterion_main!(benches);
