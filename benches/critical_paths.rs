//! Criterion benchmarks for microsprite critical paths
//!
//! Benchmarks the core performance-critical operations:
//! - Literal: comment stripping and initializer extraction
//! - Parser: byte tokens and annotations
//! - Loader: column unpacking and rasterization
//! - Collision: bounding-box rejection and pixel-exact checks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use microsprite::collision::{detect_collision, detect_collisions, Placed};
use microsprite::font::FONT_SOURCE;
use microsprite::literal::{extract, strip_comments};
use microsprite::loader::{load_sprite, SpriteLoader};
use microsprite::parser::decode_metadata;
use microsprite::raster::{rasterize, RasterSurface};

// =============================================================================
// Test Data Generators
// =============================================================================

/// Generate an annotated source fragment of `width` x `height` pixels
fn make_source(width: usize, height: usize) -> String {
    let pages = height.div_ceil(8);
    let bytes: Vec<String> = (0..width * pages).map(|i| format!("0x{:02X}", (i * 37) % 256)).collect();
    let lines: Vec<String> = bytes.chunks(16).map(|chunk| format!("  {},", chunk.join(", "))).collect();
    format!(
        "// generated\nconst uint8_t bench[] PROGMEM = {{\n  /*{}x{}*/\n{}\n}};\n",
        width,
        height,
        lines.join("\n")
    )
}

/// Generate a checkerboard mask
fn make_mask(width: usize, height: usize) -> String {
    (0..height)
        .map(|y| (0..width).map(|x| if (x + y) % 2 == 0 { '#' } else { '.' }).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Literal Benchmarks
// =============================================================================

fn bench_literal(c: &mut Criterion) {
    let mut group = c.benchmark_group("literal");

    group.throughput(Throughput::Bytes(FONT_SOURCE.len() as u64));
    group.bench_function("strip_comments_font", |b| b.iter(|| strip_comments(black_box(FONT_SOURCE))));
    group.bench_function("extract_font", |b| b.iter(|| extract(black_box(FONT_SOURCE))));

    group.finish();
}

// =============================================================================
// Parser Benchmarks
// =============================================================================

fn bench_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");

    for size in [8, 32, 128].iter() {
        let source = make_source(*size, *size);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::new("decode_metadata", size), &source, |b, source| {
            b.iter(|| decode_metadata(black_box(source)))
        });
    }

    group.bench_function("decode_metadata_font", |b| b.iter(|| decode_metadata(black_box(FONT_SOURCE))));

    group.finish();
}

// =============================================================================
// Loader Benchmarks
// =============================================================================

fn bench_loader(c: &mut Criterion) {
    let mut group = c.benchmark_group("loader");

    for size in [8, 32, 128].iter() {
        let source = make_source(*size, *size);
        group.throughput(Throughput::Elements((*size * *size) as u64));
        group.bench_with_input(BenchmarkId::new("load", size), &source, |b, source| {
            let loader = SpriteLoader::new();
            b.iter(|| loader.load(black_box(source)))
        });
    }

    let mask = make_mask(64, 64);
    group.bench_function("rasterize_64x64", |b| b.iter(|| rasterize(black_box(&mask))));

    group.sample_size(20);
    group.bench_function("load_font", |b| b.iter(|| load_sprite(black_box(FONT_SOURCE))));

    group.finish();
}

// =============================================================================
// Collision Benchmarks
// =============================================================================

fn bench_collision(c: &mut Criterion) {
    let mut group = c.benchmark_group("collision");

    let a = RasterSurface::filled(32, 32);
    let b = RasterSurface::filled(32, 32);
    let checker = rasterize(&make_mask(32, 32)).expect("valid mask");

    group.bench_function("bbox_reject", |bench| {
        bench.iter(|| detect_collision(&a, 0, 0, &b, black_box(100), 100, true))
    });
    group.bench_function("bbox_only_overlap", |bench| {
        bench.iter(|| detect_collision(&a, 0, 0, &b, black_box(16), 16, false))
    });
    group.bench_function("precise_overlap", |bench| {
        bench.iter(|| detect_collision(&a, 0, 0, &checker, black_box(16), 16, true))
    });
    group.bench_function("precise_miss", |bench| {
        // Shifted by one the checkerboard never overlaps itself
        bench.iter(|| detect_collision(&checker, 0, 0, &checker, black_box(1), 0, true))
    });

    let pairs: Vec<_> = (0..256)
        .map(|i| (Placed::new(&a, 0, 0), Placed::new(&checker, (i % 64) - 32, (i / 8) - 16)))
        .collect();
    group.throughput(Throughput::Elements(pairs.len() as u64));
    group.bench_function("batch_256", |bench| {
        bench.iter(|| detect_collisions(black_box(&pairs), true))
    });

    group.finish();
}

criterion_group!(benches, bench_literal, bench_parser, bench_loader, bench_collision);
criterion_main!(benches);
