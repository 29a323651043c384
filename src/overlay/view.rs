//! What an overlay wants drawn for one render pass

use crate::geometry::Placement;
use crate::tags::SubmitError;

use super::events::TagKey;

/// A confirmed or transient tag with its resolved placement
#[derive(Debug, Clone, PartialEq)]
pub struct TagView<'a> {
    pub id: &'a str,
    pub placement: Placement,
    pub transient: bool,
    /// De-emphasize the remove affordance while a write is outstanding
    pub remove_muted: bool,
}

impl TagView<'_> {
    pub fn key(&self) -> TagKey {
        TagKey {
            id: self.id.to_string(),
            transient: self.transient,
        }
    }
}

/// The open editor input
#[derive(Debug, Clone, PartialEq)]
pub struct EditorView<'a> {
    pub placement: Placement,
    pub value: &'a str,
    pub autofocus: bool,
    pub error: Option<&'a SubmitError>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverlayView<'a> {
    /// Confirmed tags in caller order, followed by the transient tag
    pub tags: Vec<TagView<'a>>,
    pub editor: Option<EditorView<'a>>,
    pub write_outstanding: bool,
}

impl<'a> OverlayView<'a> {
    pub fn tag(&self, id: &str) -> Option<&TagView<'a>> {
        self.tags.iter().find(|tag| tag.id == id)
    }

    pub fn transient(&self) -> Option<&TagView<'a>> {
        self.tags.iter().find(|tag| tag.transient)
    }
}
