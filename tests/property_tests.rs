//! Property-based tests using proptest
//!
//! Invariants that must hold for any occluder layout:
//! - intersect recovers a known crossing point
//! - the viewer's own tile is always LOS-visible
//! - tiles past the view radius are never visible
//! - the ray fan is angle-sorted and closes around the viewer
//! - identical inputs give identical outputs

use std::f64::consts::PI;

use proptest::prelude::*;

use dungeon_light::{
    CastParams, Segment, TileGrid, TileMap, TileType, VisibilityPolygon, intersect, visible_tiles,
    wall_segments,
};

const W: usize = 10;
const H: usize = 8;

fn grid_strategy() -> impl Strategy<Value = TileMap> {
    prop::collection::vec(prop::bool::weighted(0.25), W * H).prop_map(|walls| {
        let mut map = TileMap::new(W, H);
        for (i, wall) in walls.into_iter().enumerate() {
            if wall {
                map.set((i % W) as i32, (i / W) as i32, TileType::Wall);
            }
        }
        map
    })
}

fn viewer_strategy() -> impl Strategy<Value = [f64; 2]> {
    (0.5f64..(W * 32) as f64 - 0.5, 0.5f64..(H * 32) as f64 - 0.5).prop_map(|(x, y)| [x, y])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_intersect_recovers_crossing(
        px in -500.0f64..500.0,
        py in -500.0f64..500.0,
        a1 in 0.0f64..PI,
        turn in 0.1f64..(PI - 0.1),
        la in 1.0f64..100.0,
        lb in 1.0f64..100.0,
    ) {
        let a2 = a1 + turn;
        let (sa, ca) = a1.sin_cos();
        let (sb, cb) = a2.sin_cos();
        let a = Segment::new([px - la * ca, py - la * sa], [px + la * ca, py + la * sa]);
        let b = Segment::new([px - lb * cb, py - lb * sb], [px + lb * cb, py + lb * sb]);

        let p = intersect(&a, &b);
        prop_assert!(p.is_some());
        let p = p.unwrap();
        prop_assert!((p[0] - px).abs() < 1e-6 && (p[1] - py).abs() < 1e-6, "{:?} vs ({}, {})", p, px, py);

        // A copy of `a` moved 5 units sideways never meets it.
        let off = Segment::new(
            [a.start[0] - 5.0 * sa, a.start[1] + 5.0 * ca],
            [a.end[0] - 5.0 * sa, a.end[1] + 5.0 * ca],
        );
        prop_assert_eq!(intersect(&a, &off), None);
    }

    #[test]
    fn prop_viewer_tile_always_visible(map in grid_strategy(), viewer in viewer_strategy(), radius in 32.0f64..600.0) {
        let mask = visible_tiles(&map, viewer, radius);
        let (tx, ty) = map.tile_at(viewer);
        prop_assert!(mask.get(tx, ty));
    }

    #[test]
    fn prop_radius_cutoff(map in grid_strategy(), viewer in viewer_strategy(), radius in 32.0f64..200.0) {
        let mask = visible_tiles(&map, viewer, radius);
        let own = map.tile_at(viewer);
        for ty in 0..H as i32 {
            for tx in 0..W as i32 {
                let cx = (tx as f64 + 0.5) * 32.0 - viewer[0];
                let cy = (ty as f64 + 0.5) * 32.0 - viewer[1];
                if (tx, ty) != own && cx * cx + cy * cy > radius * radius {
                    prop_assert!(!mask.get(tx, ty), "tile ({}, {}) beyond radius", tx, ty);
                }
            }
        }
    }

    #[test]
    fn prop_fan_sorted_and_closed(map in grid_strategy(), viewer in viewer_strategy()) {
        let params = CastParams::default();
        let poly = VisibilityPolygon::compute(viewer, &wall_segments(&map), &params);
        let rays = poly.rays();
        prop_assert!(rays.len() >= 2);

        for w in rays.windows(2) {
            prop_assert!(w[0].angle <= w[1].angle);
            prop_assert!(w[1].angle - w[0].angle <= params.max_fan_gap + 1e-9);
        }
        let wrap = rays[0].angle + 2.0 * PI - rays[rays.len() - 1].angle;
        prop_assert!(wrap <= params.max_fan_gap + 1e-9);
        prop_assert!(rays.iter().all(|r| r.angle > -PI && r.angle <= PI));
        prop_assert_eq!(poly.triangles().count(), rays.len());
    }

    #[test]
    fn prop_deterministic(map in grid_strategy(), viewer in viewer_strategy()) {
        let segs = wall_segments(&map);
        let params = CastParams::default();
        prop_assert_eq!(
            VisibilityPolygon::compute(viewer, &segs, &params),
            VisibilityPolygon::compute(viewer, &segs, &params)
        );
        prop_assert_eq!(visible_tiles(&map, viewer, 300.0), visible_tiles(&map, viewer, 300.0));
    }
}
