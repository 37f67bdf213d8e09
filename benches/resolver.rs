//! Benchmarks for source location resolution.
//!
//! Tests lookup performance over debug symbols of different shapes:
//! - Sequence point blob decoding
//! - Exact hits
//! - Nearest-preceding fallback over long method bodies
//! - Corrupt symbol data

extern crate dotpatch;

use criterion::{criterion_group, criterion_main, Criterion};
use dotpatch::{
    metadata::sequencepoints::{encode_sequence_points, parse_sequence_points},
    prelude::*,
};
use std::hint::black_box;

/// Every fourth instruction starts a new statement.
fn points(count: u32) -> Vec<SequencePoint> {
    (0..count)
        .filter(|index| index % 4 == 0)
        .map(|index| {
            let line = 10 + index / 4;
            SequencePoint::new(index * 2, line, 9, line, 40)
        })
        .collect()
}

fn module_with_method(instructions: u32) -> (CompiledModule, Token) {
    let mut module = CompiledModule::new("Bench", AssemblyVersion::new(1, 0, 0, 0));
    let ty = module.add_type("Bench", "Hot").unwrap();
    let body = MethodBody::new(
        (0..instructions)
            .map(|index| Instruction::new(index * 2, "nop", Operand::None))
            .collect(),
    );
    let method = module
        .add_method(ty, "Run", MethodAttributes::PUBLIC, vec![], Some(body))
        .unwrap();

    let mut symbols = DebugSymbolStoreBuilder::new();
    let document = symbols.add_document("Hot.cs");
    symbols
        .add_method(method, document, &points(instructions))
        .unwrap();
    module.attach_symbols(symbols.build());

    (module, method)
}

/// Benchmark decoding a blob with 256 sequence points.
fn bench_parse_sequence_points(c: &mut Criterion) {
    let blob = encode_sequence_points(&points(1024)).unwrap();

    c.bench_function("parse_sequence_points_256", |b| {
        b.iter(|| {
            let points = parse_sequence_points(black_box(&blob)).unwrap();
            black_box(points)
        });
    });
}

/// Benchmark an exact sequence point hit.
fn bench_resolve_exact(c: &mut Criterion) {
    let (module, method) = module_with_method(256);
    let resolver = SourceLocationResolver::new(&module);

    c.bench_function("resolve_exact", |b| {
        b.iter(|| black_box(resolver.resolve(method, black_box(Some(64)), false)));
    });
}

/// Benchmark the nearest fallback at the end of a long body.
fn bench_resolve_nearest(c: &mut Criterion) {
    let (module, method) = module_with_method(4096);
    let resolver = SourceLocationResolver::new(&module);

    c.bench_function("resolve_nearest_4096", |b| {
        b.iter(|| black_box(resolver.resolve(method, black_box(Some(8189)), true)));
    });
}

/// Benchmark resolution against a truncated blob.
fn bench_resolve_corrupt(c: &mut Criterion) {
    let (mut module, method) = module_with_method(16);
    let mut symbols = DebugSymbolStoreBuilder::new();
    let document = symbols.add_document("Hot.cs");
    symbols
        .add_raw_method(method, document, &[0x00, 0x0A, 0x09, 0x00])
        .unwrap();
    module.attach_symbols(symbols.build());
    let resolver = SourceLocationResolver::new(&module);

    c.bench_function("resolve_corrupt", |b| {
        b.iter(|| black_box(resolver.resolve(method, black_box(None), true)));
    });
}

criterion_group!(
    benches,
    bench_parse_sequence_points,
    bench_resolve_exact,
    bench_resolve_nearest,
    bench_resolve_corrupt,
);
criterion_main!(benches);
