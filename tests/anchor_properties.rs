//! Property tests for the coordinate mapper

use proptest::prelude::*;
use tag_overlay::geometry::{HorizontalAnchor, VerticalAnchor};
use tag_overlay::{
    to_anchored_offsets, to_normalized, ContainerSize, NormalizedPoint, PixelPoint,
};

fn css_properties(css: &str) -> Vec<&str> {
    css.split(';')
        .filter_map(|decl| decl.split(':').next())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}

#[test]
fn test_center_uses_left_and_top() {
    let placement = to_anchored_offsets(NormalizedPoint::new(0.5, 0.5));
    assert_eq!(placement.to_css(), "left: 50%; top: 50%;");
}

#[test]
fn test_far_corner_uses_right() {
    let placement = to_anchored_offsets(NormalizedPoint::new(0.9, 0.1));
    assert_eq!(placement.to_css(), "right: 10%; top: 10%;");
}

proptest! {
    #[test]
    fn prop_one_anchor_per_axis(x in 0.0f64..=1.0, y in 0.0f64..=1.0) {
        let placement = to_anchored_offsets(NormalizedPoint::new(x, y));
        let css = placement.to_css();
        let names = css_properties(&css);

        prop_assert_eq!(names.len(), 2);
        prop_assert_eq!(
            names.iter().filter(|n| **n == "left" || **n == "right").count(),
            1
        );
        prop_assert_eq!(
            names.iter().filter(|n| **n == "top" || **n == "bottom").count(),
            1
        );
    }

    #[test]
    fn prop_anchor_is_nearer_edge(x in 0.0f64..=1.0, y in 0.0f64..=1.0) {
        let placement = to_anchored_offsets(NormalizedPoint::new(x, y));
        match placement.horizontal {
            HorizontalAnchor::Left(p) => {
                prop_assert!(x <= 0.5);
                prop_assert!((p - x * 100.0).abs() < 1e-9);
            }
            HorizontalAnchor::Right(p) => {
                prop_assert!(x > 0.5);
                prop_assert!((p - (1.0 - x) * 100.0).abs() < 1e-9);
            }
        }
        match placement.vertical {
            VerticalAnchor::Top(p) => prop_assert!(y <= 0.5 && p <= 50.0),
            VerticalAnchor::Bottom(p) => prop_assert!(y > 0.5 && p < 50.0),
        }
    }

    #[test]
    fn prop_normalized_is_ratio(
        px in 0.0f64..2000.0,
        py in 0.0f64..2000.0,
        width in 1.0f64..2000.0,
        height in 1.0f64..2000.0,
    ) {
        let point = to_normalized(PixelPoint::new(px, py), ContainerSize::new(width, height))
            .unwrap();
        prop_assert!((point.x - px / width).abs() < 1e-12);
        prop_assert!((point.y - py / height).abs() < 1e-12);
    }

    #[test]
    fn prop_degenerate_container_rejected(px in 0.0f64..100.0, height in 0.0f64..100.0) {
        let result = to_normalized(PixelPoint::new(px, px), ContainerSize::new(0.0, height));
        prop_assert!(result.is_err());
    }
}
