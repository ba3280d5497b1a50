//! Performance benchmarks for aicat

use aicat::test_utils::TestTree;
use aicat::{
    FileWalker, FilterStack, IgnoreCache, IgnoreRules, NameFilter, WalkerConfig, glob_match,
};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::path::Path;
use std::sync::Arc;

const RULES: &str = r#"# build output
target/
*.log
*.tmp
/dist
**/node_modules/
!important.log
docs/**/*.draft
"#;

/// A tree `depth` levels deep with `width` directories per level, each
/// holding a few files and its own `.gitignore`.
fn create_nested_tree(depth: usize, width: usize) -> TestTree {
    let tree = TestTree::new();
    tree.add_gitignore("", RULES);

    let mut level = vec![String::new()];
    for d in 0..depth {
        let mut next = Vec::new();
        for parent in &level {
            for w in 0..width {
                let dir = if parent.is_empty() {
                    format!("dir_{}_{}", d, w)
                } else {
                    format!("{}/dir_{}_{}", parent, d, w)
                };
                tree.add_gitignore(&dir, "*.bak\n");
                for f in 0..4 {
                    tree.add_file(&format!("{}/file_{}.rs", dir, f), "fn main() {}");
                }
                tree.add_file(&format!("{}/debug.log", dir), "log");
                tree.add_file(&format!("{}/old.bak", dir), "bak");
                next.push(dir);
            }
        }
        level = next;
    }
    tree
}

fn bench_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("walk");

    let small = create_nested_tree(2, 3);
    group.bench_function("small_tree", |b| {
        b.iter(|| {
            let cache = IgnoreCache::new();
            let walker = FileWalker::new(WalkerConfig::default(), NameFilter::default(), &cache);
            walker.walk(black_box(small.path()))
        })
    });

    let large = create_nested_tree(3, 5);
    group.bench_function("large_tree", |b| {
        b.iter(|| {
            let cache = IgnoreCache::new();
            let walker = FileWalker::new(WalkerConfig::default(), NameFilter::default(), &cache);
            walker.walk(black_box(large.path()))
        })
    });

    let cache = IgnoreCache::new();
    group.bench_function("large_tree_warm_cache", |b| {
        b.iter(|| {
            let walker = FileWalker::new(WalkerConfig::default(), NameFilter::default(), &cache);
            walker.walk(black_box(large.path()))
        })
    });

    group.finish();
}

fn bench_rule_compilation(c: &mut Criterion) {
    let dir = Path::new("/repo");

    c.bench_function("compile_rules", |b| {
        b.iter(|| IgnoreRules::compile(black_box(dir), black_box(RULES)))
    });
}

fn bench_filter_stack(c: &mut Criterion) {
    let root = Path::new("/repo");
    let nested = Path::new("/repo/src/deep/er");
    let stack = FilterStack::new()
        .push(root, Arc::new(IgnoreRules::compile(root, RULES)))
        .push(
            Path::new("/repo/src"),
            Arc::new(IgnoreRules::compile(Path::new("/repo/src"), "*.bak\n")),
        )
        .push(
            nested,
            Arc::new(IgnoreRules::compile(nested, "generated/\n")),
        );

    let mut group = c.benchmark_group("filter_stack");

    group.bench_function("allowed_file", |b| {
        b.iter(|| stack.is_allowed(black_box(Path::new("/repo/src/deep/er/main.rs")), false))
    });

    group.bench_function("excluded_file", |b| {
        b.iter(|| stack.is_allowed(black_box(Path::new("/repo/src/deep/er/trace.log")), false))
    });

    group.bench_function("excluded_ancestor", |b| {
        b.iter(|| {
            stack.is_allowed(
                black_box(Path::new("/repo/src/deep/er/generated/out.rs")),
                false,
            )
        })
    });

    group.finish();
}

fn bench_glob_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("glob_match");

    group.bench_function("suffix", |b| {
        b.iter(|| glob_match(black_box("*.rs"), black_box("walker.rs")))
    });

    group.bench_function("class", |b| {
        b.iter(|| glob_match(black_box("[a-m]*_test.go"), black_box("handler_test.go")))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_walk,
    bench_rule_compilation,
    bench_filter_stack,
    bench_glob_match,
);
criterion_main!(benches);
