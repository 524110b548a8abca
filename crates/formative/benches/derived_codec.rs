//! Derived Codec Benchmarks
//!
//! Measures reading and writing through derived codecs against serde's own
//! derive on the same types. The derived path goes through type-erased
//! field codecs, so the serde numbers are the floor.
//!
//! # Payload Sizes
//!
//! - **Small**: one flat record with an optional member
//! - **Medium**: a record with nested lists
//! - **Recursive**: a tree of fixed fan-out, exercising the deferred codec

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use formative::prelude::*;
use formative::{DerivedFormat, derive};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Benchmark Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Product)]
struct Small {
    key: String,
    flags: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    ttl_seconds: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Product)]
struct Medium {
    user_id: u64,
    username: String,
    email: String,
    permissions: Vec<String>,
    scores: Vec<f64>,
    created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Product)]
struct Tree {
    label: String,
    children: Vec<Tree>,
}

// ============================================================================
// Test Data Generators
// ============================================================================

fn create_small() -> Small {
    Small {
        key: "config.feature.enabled".to_string(),
        flags: 7,
        ttl_seconds: Some(300),
    }
}

fn create_medium() -> Medium {
    Medium {
        user_id: 12345678,
        username: "user_12345678".to_string(),
        email: "user_12345678@example.com".to_string(),
        permissions: (0..15).map(|i| format!("scope_{i}.read")).collect(),
        scores: (0..20).map(|i| i as f64 * 0.25).collect(),
        created_at: 1700000000,
    }
}

fn create_tree(depth: usize, fan_out: usize) -> Tree {
    Tree {
        label: format!("node_{depth}"),
        children: if depth == 0 {
            vec![]
        } else {
            (0..fan_out).map(|_| create_tree(depth - 1, fan_out)).collect()
        },
    }
}

fn derived<T: Product>() -> DerivedFormat<T> {
    let registry = CodecRegistry::with_defaults();
    derive::format::<T>(&registry).unwrap()
}

fn bench_pair<T>(c: &mut Criterion, name: &str, value: &T)
where
    T: Product + Serialize + serde::de::DeserializeOwned,
{
    let mut group = c.benchmark_group(name);
    let format = derived::<T>();
    let tree: Value = format.write(value);
    let text = tree.to_string();

    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function(BenchmarkId::new("write", "derived"), |b| {
        b.iter(|| format.write(black_box(value)))
    });
    group.bench_function(BenchmarkId::new("write", "serde"), |b| {
        b.iter(|| serde_json::to_value(black_box(value)).unwrap())
    });
    group.bench_function(BenchmarkId::new("read", "derived"), |b| {
        b.iter(|| format.read(black_box(&tree)).unwrap())
    });
    group.bench_function(BenchmarkId::new("read", "serde"), |b| {
        b.iter(|| T::deserialize(black_box(&tree)).unwrap())
    });

    group.finish();
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_small(c: &mut Criterion) {
    bench_pair(c, "small_record", &create_small());
}

fn bench_medium(c: &mut Criterion) {
    bench_pair(c, "medium_record", &create_medium());
}

fn bench_recursive(c: &mut Criterion) {
    for depth in [2, 4, 6] {
        bench_pair(c, &format!("tree_depth_{depth}"), &create_tree(depth, 3));
    }
}

fn bench_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("derivation");
    let registry = CodecRegistry::with_defaults();

    group.bench_function("flat", |b| {
        b.iter(|| derive::format::<Medium>(black_box(&registry)).unwrap())
    });
    group.bench_function("recursive", |b| {
        b.iter(|| derive::format::<Tree>(black_box(&registry)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_small, bench_medium, bench_recursive, bench_derivation);

criterion_main!(benches);
