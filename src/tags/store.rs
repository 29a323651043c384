//! Boundary to the store of record that persists tags

use std::collections::HashMap;

use log::{debug, warn};

use super::types::{RequestToken, Tag};

/// Identifies the image a set of tags belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef {
    pub post_id: String,
    pub image_id: String,
}

impl ImageRef {
    pub fn new(post_id: impl Into<String>, image_id: impl Into<String>) -> Self {
        Self {
            post_id: post_id.into(),
            image_id: image_id.into(),
        }
    }
}

/// External collaborator that durably adds and removes tags
///
/// Both calls are fire-and-forget: their effect is only observed through a
/// later confirmed-tag collection.
pub trait TagStore {
    fn add_tag(&mut self, post_id: &str, image_id: &str, tag: &Tag, token: RequestToken);

    fn remove_tag(&mut self, post_id: &str, image_id: &str, tag_id: &str);
}

/// A request received by a [`MemoryStore`] and not yet applied
#[derive(Debug, Clone, PartialEq)]
pub enum StoreRequest {
    Add {
        post_id: String,
        image_id: String,
        tag: Tag,
        token: RequestToken,
    },
    Remove {
        post_id: String,
        image_id: String,
        tag_id: String,
    },
}

/// Outcome of applying queued requests
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlushReport {
    pub added: Vec<RequestToken>,
    pub removed: Vec<String>,
    pub failed: Vec<RequestToken>,
}

/// In-memory store that queues requests until [`MemoryStore::flush`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    tags: HashMap<(String, String), Vec<Tag>>,
    queue: Vec<StoreRequest>,
    fail_next: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the confirmed tags for one image
    pub fn with_tags(
        mut self,
        post_id: impl Into<String>,
        image_id: impl Into<String>,
        tags: Vec<Tag>,
    ) -> Self {
        self.tags.insert((post_id.into(), image_id.into()), tags);
        self
    }

    /// Confirmed tags for an image
    pub fn tags(&self, post_id: &str, image_id: &str) -> &[Tag] {
        self.tags
            .get(&(post_id.to_string(), image_id.to_string()))
            .map(|tags| tags.as_slice())
            .unwrap_or(&[])
    }

    /// Requests received but not yet applied
    pub fn pending(&self) -> &[StoreRequest] {
        &self.queue
    }

    /// Make the next applied add request fail
    pub fn fail_next_add(&mut self) {
        self.fail_next = true;
    }

    /// Apply every queued request in arrival order
    pub fn flush(&mut self) -> FlushReport {
        let mut report = FlushReport::default();
        for request in std::mem::take(&mut self.queue) {
            match request {
                StoreRequest::Add {
                    post_id,
                    image_id,
                    tag,
                    token,
                } => {
                    if std::mem::take(&mut self.fail_next) {
                        warn!("store rejected add {} for tag '{}'", token, tag.id());
                        report.failed.push(token);
                        continue;
                    }
                    let tags = self.tags.entry((post_id, image_id)).or_default();
                    // Re-adding an id replaces the stored position
                    tags.retain(|existing| existing.id() != tag.id());
                    tags.push(tag);
                    report.added.push(token);
                }
                StoreRequest::Remove {
                    post_id,
                    image_id,
                    tag_id,
                } => {
                    if let Some(tags) = self.tags.get_mut(&(post_id, image_id)) {
                        let before = tags.len();
                        tags.retain(|existing| existing.id() != tag_id);
                        if tags.len() != before {
                            report.removed.push(tag_id);
                        }
                    }
                }
            }
        }
        debug!(
            "flushed store: {} added, {} removed, {} failed",
            report.added.len(),
            report.removed.len(),
            report.failed.len()
        );
        report
    }
}

impl TagStore for MemoryStore {
    fn add_tag(&mut self, post_id: &str, image_id: &str, tag: &Tag, token: RequestToken) {
        self.queue.push(StoreRequest::Add {
            post_id: post_id.to_string(),
            image_id: image_id.to_string(),
            tag: tag.clone(),
            token,
        });
    }

    fn remove_tag(&mut self, post_id: &str, image_id: &str, tag_id: &str) {
        self.queue.push(StoreRequest::Remove {
            post_id: post_id.to_string(),
            image_id: image_id.to_string(),
            tag_id: tag_id.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(id: &str) -> Tag {
        Tag::new(id, 0.5, 0.5).unwrap()
    }

    #[test]
    fn test_requests_wait_for_flush() {
        let mut store = MemoryStore::new();
        store.add_tag("p", "i", &tag("alice"), RequestToken(1));
        assert!(store.tags("p", "i").is_empty());
        assert_eq!(store.pending().len(), 1);

        let report = store.flush();
        assert_eq!(report.added, vec![RequestToken(1)]);
        assert_eq!(store.tags("p", "i"), &[tag("alice")]);
        assert!(store.pending().is_empty());
    }

    #[test]
    fn test_remove() {
        let mut store = MemoryStore::new().with_tags("p", "i", vec![tag("alice"), tag("bob")]);
        store.remove_tag("p", "i", "alice");
        store.remove_tag("p", "i", "nobody");
        let report = store.flush();
        assert_eq!(report.removed, vec!["alice".to_string()]);
        assert_eq!(store.tags("p", "i"), &[tag("bob")]);
    }

    #[test]
    fn test_images_are_isolated() {
        let mut store = MemoryStore::new();
        store.add_tag("p", "one", &tag("alice"), RequestToken(1));
        store.flush();
        assert_eq!(store.tags("p", "one").len(), 1);
        assert!(store.tags("p", "two").is_empty());
    }

    #[test]
    fn test_fail_next_add() {
        let mut store = MemoryStore::new();
        store.fail_next_add();
        store.add_tag("p", "i", &tag("alice"), RequestToken(1));
        store.add_tag("p", "i", &tag("bob"), RequestToken(2));
        let report = store.flush();
        assert_eq!(report.failed, vec![RequestToken(1)]);
        assert_eq!(report.added, vec![RequestToken(2)]);
        assert_eq!(store.tags("p", "i"), &[tag("bob")]);
    }
}
