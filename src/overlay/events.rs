//! Input events delivered to an overlay by its host

use crate::geometry::{ContainerSize, PixelPoint};

/// Identifies a rendered tag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagKey {
    pub id: String,
    pub transient: bool,
}

impl TagKey {
    pub fn confirmed(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            transient: false,
        }
    }

    pub fn transient(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            transient: true,
        }
    }
}

/// Innermost element a click landed on
#[derive(Debug, Clone, PartialEq)]
pub enum ClickTarget {
    /// The click-catching surface covering the image
    Surface,
    /// The body of a rendered tag
    Tag(TagKey),
    /// The remove affordance inside a rendered tag
    RemoveAffordance(TagKey),
}

/// A pointer click with an element-relative offset
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub offset: PixelPoint,
    /// Rendered size of the element that received the click
    pub target_size: ContainerSize,
    pub target: ClickTarget,
}

impl PointerEvent {
    /// A click on the image surface
    pub fn surface(offset: PixelPoint, target_size: ContainerSize) -> Self {
        Self {
            offset,
            target_size,
            target: ClickTarget::Surface,
        }
    }

    /// A click on a tag or one of its parts
    pub fn on(target: ClickTarget) -> Self {
        Self {
            offset: PixelPoint::new(0.0, 0.0),
            target_size: ContainerSize::new(0.0, 0.0),
            target,
        }
    }
}

/// Keys the overlay reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Other(String),
}

impl Key {
    /// Parse a key identifier such as `"Enter"` or `"Escape"`
    pub fn from_identifier(identifier: &str) -> Self {
        match identifier {
            "Enter" => Self::Enter,
            "Escape" | "Esc" => Self::Escape,
            other => Self::Other(other.to_string()),
        }
    }

    /// Map a legacy numeric key code
    pub fn from_code(code: u32) -> Self {
        match code {
            13 => Self::Enter,
            27 => Self::Escape,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self { key }
    }

    pub fn is_escape(&self) -> bool {
        self.key == Key::Escape
    }

    pub fn is_enter(&self) -> bool {
        self.key == Key::Enter
    }
}
