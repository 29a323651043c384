//! Core types for coordinate mapping

use std::fmt;

use serde::{Deserialize, Serialize};

/// A pointer position in pixels, relative to the element that received it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Rendered size of the element a click landed on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl ContainerSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions are strictly positive (NaN is not)
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// A resolution-independent position, nominally in `[0, 1]` on both axes
///
/// Values are never clamped on construction: pointer events coming from
/// overlapping elements can land slightly outside the container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

impl NormalizedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates fall inside the unit square
    pub fn is_within_bounds(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }

    /// Copy of this point with both coordinates clamped to `[0, 1]`
    pub fn clamped(&self) -> Self {
        Self {
            x: self.x.clamp(0.0, 1.0),
            y: self.y.clamp(0.0, 1.0),
        }
    }
}

/// Horizontal edge a placement is measured from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HorizontalAnchor {
    /// Percent distance from the left edge
    Left(f64),
    /// Percent distance from the right edge
    Right(f64),
}

impl HorizontalAnchor {
    pub fn property(&self) -> &'static str {
        match self {
            Self::Left(_) => "left",
            Self::Right(_) => "right",
        }
    }

    pub fn percent(&self) -> f64 {
        match self {
            Self::Left(p) | Self::Right(p) => *p,
        }
    }
}

/// Vertical edge a placement is measured from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VerticalAnchor {
    /// Percent distance from the top edge
    Top(f64),
    /// Percent distance from the bottom edge
    Bottom(f64),
}

impl VerticalAnchor {
    pub fn property(&self) -> &'static str {
        match self {
            Self::Top(_) => "top",
            Self::Bottom(_) => "bottom",
        }
    }

    pub fn percent(&self) -> f64 {
        match self {
            Self::Top(p) | Self::Bottom(p) => *p,
        }
    }
}

/// Edge-relative placement of an element whose own size is unknown
///
/// Holds exactly one horizontal and one vertical anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub horizontal: HorizontalAnchor,
    pub vertical: VerticalAnchor,
}

impl Placement {
    /// Inline CSS declarations, e.g. `left: 20%; top: 30%;`
    pub fn to_css(&self) -> String {
        format!(
            "{}: {}%; {}: {}%;",
            self.horizontal.property(),
            format_percent(self.horizontal.percent()),
            self.vertical.property(),
            format_percent(self.vertical.percent())
        )
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// Format a percentage with at most four decimals and no trailing zeros
pub fn format_percent(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    // Avoid printing "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{}", rounded)
}
