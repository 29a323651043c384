//! Pixel to normalized conversion and overflow-safe anchoring

use super::error::GeometryError;
use super::types::{
    ContainerSize, HorizontalAnchor, NormalizedPoint, PixelPoint, Placement, VerticalAnchor,
};

/// Convert an element-relative click position into normalized coordinates
///
/// The result is not clamped. A container without area is rejected instead
/// of producing infinite or NaN coordinates.
pub fn to_normalized(
    pixel: PixelPoint,
    container: ContainerSize,
) -> Result<NormalizedPoint, GeometryError> {
    if !container.has_area() {
        return Err(GeometryError::degenerate(container.width, container.height));
    }

    Ok(NormalizedPoint::new(
        pixel.x / container.width,
        pixel.y / container.height,
    ))
}

/// Compute the placement of an element anchored at a normalized point
///
/// Points past the middle of an axis are measured from the far edge, so an
/// element of unknown size grows back toward the center instead of
/// overflowing the container. The middle itself anchors from the near edge.
pub fn to_anchored_offsets(point: NormalizedPoint) -> Placement {
    let x_percent = point.x * 100.0;
    let y_percent = point.y * 100.0;

    let horizontal = if point.x > 0.5 {
        HorizontalAnchor::Right(100.0 - x_percent)
    } else {
        HorizontalAnchor::Left(x_percent)
    };

    let vertical = if point.y > 0.5 {
        VerticalAnchor::Bottom(100.0 - y_percent)
    } else {
        VerticalAnchor::Top(y_percent)
    };

    Placement {
        horizontal,
        vertical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_to_normalized() {
        let p = to_normalized(PixelPoint::new(160.0, 90.0), ContainerSize::new(640.0, 360.0))
            .unwrap();
        assert_close(p.x, 0.25);
        assert_close(p.y, 0.25);
    }

    #[test]
    fn test_to_normalized_out_of_bounds_is_kept() {
        let p = to_normalized(PixelPoint::new(700.0, -20.0), ContainerSize::new(500.0, 200.0))
            .unwrap();
        assert_close(p.x, 1.4);
        assert_close(p.y, -0.1);
    }

    #[test]
    fn test_to_normalized_zero_area() {
        let err = to_normalized(PixelPoint::new(10.0, 10.0), ContainerSize::new(0.0, 100.0))
            .unwrap_err();
        assert_eq!(err, GeometryError::degenerate(0.0, 100.0));

        assert!(
            to_normalized(PixelPoint::new(10.0, 10.0), ContainerSize::new(100.0, 0.0)).is_err()
        );
    }

    #[test]
    fn test_center_uses_near_edges() {
        let placement = to_anchored_offsets(NormalizedPoint::new(0.5, 0.5));
        assert_eq!(placement.horizontal, HorizontalAnchor::Left(50.0));
        assert_eq!(placement.vertical, VerticalAnchor::Top(50.0));
    }

    #[test]
    fn test_far_right_near_top() {
        let placement = to_anchored_offsets(NormalizedPoint::new(0.9, 0.1));
        match placement.horizontal {
            HorizontalAnchor::Right(p) => assert_close(p, 10.0),
            other => panic!("expected right anchor, got {other:?}"),
        }
        match placement.vertical {
            VerticalAnchor::Top(p) => assert_close(p, 10.0),
            other => panic!("expected top anchor, got {other:?}"),
        }
    }

    #[test]
    fn test_bottom_left() {
        let placement = to_anchored_offsets(NormalizedPoint::new(0.0, 0.75));
        assert_eq!(placement.horizontal, HorizontalAnchor::Left(0.0));
        assert_eq!(placement.vertical, VerticalAnchor::Bottom(25.0));
        assert_eq!(placement.to_css(), "left: 0%; bottom: 25%;");
    }
}
