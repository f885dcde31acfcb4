use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

use dungeon_light::room::generate_room;
use dungeon_light::{CastParams, SegmentCache, VisibilityPolygon, visible_tiles, wall_segments};

const VIEWER: [f64; 2] = [384.0, 284.0];

fn bench_wall_segments(c: &mut Criterion) {
    let map = generate_room(&mut StdRng::seed_from_u64(12345));

    c.bench_function("wall_segments", |b| {
        b.iter(|| wall_segments(black_box(&map)))
    });

    let mut cache = SegmentCache::new();
    c.bench_function("wall_segments_cached", |b| {
        b.iter(|| cache.segments(black_box(&map)).len())
    });
}

fn bench_polygon(c: &mut Criterion) {
    let map = generate_room(&mut StdRng::seed_from_u64(12345));
    let segs = wall_segments(&map);
    let params = CastParams::default();

    c.bench_function("visibility_polygon_room", |b| {
        b.iter(|| VisibilityPolygon::compute(black_box(VIEWER), &segs, &params))
    });
}

fn bench_los(c: &mut Criterion) {
    let map = generate_room(&mut StdRng::seed_from_u64(12345));

    c.bench_function("visible_tiles_room", |b| {
        b.iter(|| visible_tiles(&map, black_box(VIEWER), 1000.0))
    });
}

criterion_group!(benches, bench_wall_segments, bench_polygon, bench_los);
criterion_main!(benches);
