//! Cross-shape behavioral checks.
//!
//! These tests pin down properties that hold across all shapes
//! rather than per-shape behavior: boundary strictness, agreement
//! between bounds and exact predicates, and border point placement.

use cordon_core::Vec2;
use proptest::prelude::*;

use crate::builder::ZoneBuilder;
use crate::shape::ZoneShape;
use crate::zone::Zone;

fn zone_with(shape: fn(ZoneBuilder) -> ZoneBuilder) -> Zone {
    let rec = shape(ZoneBuilder::new("probe").position(0.0, 0.0))
        .finish()
        .unwrap();
    Zone::from_record(&rec, None).unwrap()
}

#[test]
fn bounds_admit_everything_the_shape_admits() {
    let zones = [
        zone_with(|b| b.circle(25.0)),
        zone_with(|b| b.rect(30.0, 12.0)),
        zone_with(|b| {
            b.polygon(vec![
                Vec2::new(-10.0, -10.0),
                Vec2::new(10.0, -10.0),
                Vec2::new(0.0, 15.0),
            ])
        }),
    ];
    for zone in &zones {
        let b = zone.bounds();
        let step = 1.0;
        let mut x = b.min_x - 2.0;
        while x <= b.max_x + 2.0 {
            let mut z = b.min_z - 2.0;
            while z <= b.max_z + 2.0 {
                let pt = Vec2::new(x, z);
                if zone.contains_2d(pt) {
                    assert!(b.contains(pt), "{} admitted {pt} outside bounds", zone.name());
                }
                z += step;
            }
            x += step;
        }
    }
}

#[test]
fn circle_and_rect_border_points_are_outside() {
    // Circles and rectangles exclude their boundary, so every border
    // particle point sits outside its own zone. Polygon borders are
    // not covered: the crossing parity admits parts of the outline.
    let circle = zone_with(|b| b.circle(50.0));
    for p in circle.border_points() {
        assert!(!circle.contains_2d(*p), "circle contains border point {p}");
    }
    let rect = zone_with(|b| b.rect(40.0, 20.0));
    for p in rect.border_points() {
        assert!(!rect.contains_2d(*p), "rect contains border point {p}");
    }
}

#[test]
fn abutting_rects_never_share_a_point() {
    // Two rectangles meeting at x = 0. Edge exclusivity means the
    // seam belongs to neither.
    let west = ZoneShape::Rect {
        size_x: 10.0,
        size_z: 10.0,
    };
    let east = ZoneShape::Rect {
        size_x: 10.0,
        size_z: 10.0,
    };
    let west_center = Vec2::new(-5.0, 0.0);
    let east_center = Vec2::new(5.0, 0.0);
    for z in [-4.9f32, 0.0, 4.9] {
        let seam = Vec2::new(0.0, z);
        assert!(!west.contains(west_center, seam));
        assert!(!east.contains(east_center, seam));
    }
}

proptest! {
    #[test]
    fn circle_membership_matches_distance(
        x in -100.0f32..100.0,
        z in -100.0f32..100.0,
        radius in 1.0f32..80.0,
    ) {
        let shape = ZoneShape::Circle { radius };
        let center = Vec2::new(0.0, 0.0);
        let pt = Vec2::new(x, z);
        let inside = shape.contains(center, pt);
        prop_assert_eq!(inside, pt.distance(center) < radius);
    }

    #[test]
    fn rect_membership_matches_componentwise_check(
        x in -100.0f32..100.0,
        z in -100.0f32..100.0,
        size_x in 1.0f32..80.0,
        size_z in 1.0f32..80.0,
    ) {
        let shape = ZoneShape::Rect { size_x, size_z };
        let center = Vec2::new(0.0, 0.0);
        let pt = Vec2::new(x, z);
        let inside = shape.contains(center, pt);
        let expected =
            x.abs() < size_x / 2.0 && z.abs() < size_z / 2.0;
        prop_assert_eq!(inside, expected);
    }

    #[test]
    fn translated_triangle_keeps_centroid_and_bounds(
        dx in -50.0f32..50.0,
        dz in -50.0f32..50.0,
    ) {
        let moved: Vec<Vec2> = [
            Vec2::new(-10.0, -10.0),
            Vec2::new(10.0, -10.0),
            Vec2::new(0.0, 15.0),
        ]
        .iter()
        .map(|p| Vec2::new(p.x + dx, p.z + dz))
        .collect();
        let poly = crate::shape::Polygon::new(moved).unwrap();
        // The centroid is well inside regardless of translation.
        prop_assert!(poly.contains(Vec2::new(dx, dz - 5.0 / 3.0)));
        // Anything past the bounds is out.
        prop_assert!(!poly.contains(Vec2::new(dx + 11.0, dz)));
        prop_assert!(!poly.contains(Vec2::new(dx, dz - 11.0)));
    }
}
