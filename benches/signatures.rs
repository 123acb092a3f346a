//! Performance measurement for signature extraction at varying tile counts

// Criterion macros generate undocumented functions
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use seamtile::analysis::field::PixelField;
use seamtile::analysis::signatures::SignatureSet;
use seamtile::spatial::tiles::TileGeometry;
use std::hint::black_box;

fn synthetic_field(geometry: TileGeometry) -> PixelField {
    PixelField::from_oklab_fn(geometry.source_width(), geometry.source_height(), |x, y| {
        [
            ((x * 29 + y * 11) % 89) as f32 / 89.0,
            ((x * 3 + y * 19) % 61) as f32 / 122.0 - 0.25,
            ((x + y * 5) % 37) as f32 / 74.0 - 0.25,
        ]
    })
}

/// Measures full extraction cost over growing boards of 32px tiles
fn bench_signature_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("signature_extraction");

    for side in &[4usize, 8, 16] {
        let geometry = TileGeometry::new(*side, *side, 32);
        let field = synthetic_field(geometry);

        group.bench_with_input(BenchmarkId::from_parameter(side), side, |b, _| {
            b.iter(|| black_box(SignatureSet::build(&field, geometry)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_signature_extraction);
criterion_main!(benches);
