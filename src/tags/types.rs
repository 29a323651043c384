//! Tag data model

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::NormalizedPoint;

/// Errors raised when a tag crosses into the core from outside
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TagError {
    #[error("tag id must not be empty")]
    EmptyId,

    #[error("tag '{id}' has a non-finite coordinate ({x}, {y})")]
    NonFiniteCoordinate { id: String, x: f64, y: f64 },

    #[error("duplicate tag id '{0}' in confirmed tags")]
    DuplicateId(String),
}

/// A confirmed marker, as persisted by the store of record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TagRecord", into = "TagRecord")]
pub struct Tag {
    id: String,
    x: f64,
    y: f64,
}

impl Tag {
    /// Create a tag, validating its identity and coordinates
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Result<Self, TagError> {
        let id = id.into();
        if id.is_empty() {
            return Err(TagError::EmptyId);
        }
        if !x.is_finite() || !y.is_finite() {
            return Err(TagError::NonFiniteCoordinate { id, x, y });
        }
        Ok(Self { id, x, y })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn position(&self) -> NormalizedPoint {
        NormalizedPoint::new(self.x, self.y)
    }
}

/// Raw tag shape as supplied by callers and serialized stores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRecord {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

impl TryFrom<TagRecord> for Tag {
    type Error = TagError;

    fn try_from(record: TagRecord) -> Result<Self, Self::Error> {
        Tag::new(record.id, record.x, record.y)
    }
}

impl From<Tag> for TagRecord {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            x: tag.x,
            y: tag.y,
        }
    }
}

/// Validate a confirmed-tag collection at the boundary
///
/// Every record must be a valid tag and ids must be unique.
pub fn validate_collection(
    records: impl IntoIterator<Item = TagRecord>,
) -> Result<Vec<Tag>, TagError> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    for record in records {
        let tag = Tag::try_from(record)?;
        if !seen.insert(tag.id.clone()) {
            return Err(TagError::DuplicateId(tag.id));
        }
        tags.push(tag);
    }
    Ok(tags)
}

/// Client-generated identity of an add request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(pub u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// Optimistic stand-in for a tag whose add request is still in flight
#[derive(Debug, Clone, PartialEq)]
pub struct TransientTag {
    pub tag: Tag,
    pub token: RequestToken,
}

impl TransientTag {
    /// Always true; lets presentation code treat confirmed and transient
    /// tags uniformly
    pub fn is_transient(&self) -> bool {
        true
    }
}

/// In-progress text and position of a tag being created
#[derive(Debug, Clone, PartialEq)]
pub struct EditorDraft {
    pub position: NormalizedPoint,
    pub value: String,
}

impl EditorDraft {
    pub fn new(position: NormalizedPoint) -> Self {
        Self {
            position,
            value: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, x: f64, y: f64) -> TagRecord {
        TagRecord {
            id: id.to_string(),
            x,
            y,
        }
    }

    #[test]
    fn test_tag_new_rejects_empty_id() {
        assert_eq!(Tag::new("", 0.1, 0.1), Err(TagError::EmptyId));
    }

    #[test]
    fn test_tag_new_rejects_nan() {
        let err = Tag::new("bob", f64::NAN, 0.2).unwrap_err();
        assert!(matches!(err, TagError::NonFiniteCoordinate { .. }));
    }

    #[test]
    fn test_tag_accepts_out_of_range() {
        // Out of range positions are a presentation concern
        let tag = Tag::new("bob", 1.2, -0.1).unwrap();
        assert_eq!(tag.position(), NormalizedPoint::new(1.2, -0.1));
    }

    #[test]
    fn test_validate_collection() {
        let tags =
            validate_collection(vec![record("alice", 0.1, 0.2), record("bob", 0.8, 0.9)]).unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[1].id(), "bob");
    }

    #[test]
    fn test_validate_collection_duplicate() {
        let err = validate_collection(vec![record("alice", 0.1, 0.2), record("alice", 0.3, 0.4)])
            .unwrap_err();
        assert_eq!(err, TagError::DuplicateId("alice".to_string()));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Result<Tag, _> = toml::from_str("id = \"alice\"\nx = 0.5\ny = 0.25");
        assert_eq!(ok.unwrap(), Tag::new("alice", 0.5, 0.25).unwrap());

        let bad: Result<Tag, _> = toml::from_str("id = \"\"\nx = 0.5\ny = 0.25");
        assert!(bad.is_err());
    }

    #[test]
    fn test_token_display() {
        assert_eq!(RequestToken(7).to_string(), "req-7");
    }
}
