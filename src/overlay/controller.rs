//! Overlay controller
//!
//! Composes the confirmed tags supplied by the caller with the lifecycle's
//! transient tag and editor draft, and routes host events into the
//! lifecycle. The confirmed collection is never stored: it is borrowed on
//! every call that needs it.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use log::debug;

use crate::geometry::{to_anchored_offsets, to_normalized, GeometryError, NormalizedPoint};
use crate::tags::{
    ImageRef, MentionValidator, OpenOutcome, RequestToken, Resolution, SubmitContext,
    SubmitError, SubmitOutcome, Tag, TagLifecycle, TagStore, TagValidator,
};

use super::config::OverlayConfig;
use super::events::{ClickTarget, KeyEvent, PointerEvent, TagKey};
use super::keyboard::{KeyListener, KeyboardHub, Subscription};
use super::view::{EditorView, OverlayView, TagView};

/// What a click did
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// The editor opened (or moved) at this position
    EditorOpened(NormalizedPoint),
    /// A tag is pending, so the editor stays closed
    Busy,
    /// The click could not be mapped to a position
    Ignored(GeometryError),
    /// A tag body was clicked; nothing else happens
    TagClicked(TagKey),
    /// A removal was requested for this confirmed tag
    RemoveRequested(String),
    /// Transient tags have no server-side identity to remove yet
    RemoveRefused(String),
}

/// Tag overlay for a single image
pub struct Overlay<S> {
    image: ImageRef,
    store: S,
    lifecycle: TagLifecycle,
    config: OverlayConfig,
    validator: Option<Box<dyn TagValidator>>,
    focus_requested: bool,
    last_error: Option<SubmitError>,
}

impl<S: TagStore> Overlay<S> {
    pub fn new(image: ImageRef, store: S, config: OverlayConfig) -> Self {
        let lifecycle =
            TagLifecycle::new(config.confirmation).with_pending_timeout(config.pending_timeout);
        let validator = config
            .validate_mentions
            .then(|| Box::new(MentionValidator) as Box<dyn TagValidator>);

        Self {
            image,
            store,
            lifecycle,
            config,
            validator,
            focus_requested: false,
            last_error: None,
        }
    }

    /// Use a custom predicate to accept or reject submissions
    pub fn with_validator(mut self, validator: impl TagValidator + 'static) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    pub fn image(&self) -> &ImageRef {
        &self.image
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn lifecycle(&self) -> &TagLifecycle {
        &self.lifecycle
    }

    /// The error from the last rejected submit, if the draft is still open
    pub fn last_error(&self) -> Option<&SubmitError> {
        self.last_error.as_ref()
    }

    /// Register this overlay's Escape handling with `hub`
    ///
    /// The listener stays registered until the subscription is dropped.
    pub fn mount(this: &Rc<RefCell<Self>>, hub: &KeyboardHub) -> Subscription
    where
        S: 'static,
    {
        let listener: Rc<RefCell<dyn KeyListener>> = this.clone();
        hub.subscribe(Rc::downgrade(&listener))
    }

    /// Route a click to its innermost target
    ///
    /// Clicks on a tag or its remove affordance are handled there and never
    /// reach the surface handler that opens the editor.
    pub fn handle_click(&mut self, event: &PointerEvent) -> ClickOutcome {
        self.handle_click_at(event, Instant::now())
    }

    /// Route a click, first timing out an overdue pending request
    pub fn handle_click_at(&mut self, event: &PointerEvent, now: Instant) -> ClickOutcome {
        match &event.target {
            ClickTarget::RemoveAffordance(key) => self.remove(key),
            ClickTarget::Tag(key) => ClickOutcome::TagClicked(key.clone()),
            ClickTarget::Surface => {
                self.lifecycle.expire(now);
                self.open_editor(event)
            }
        }
    }

    /// Track the editor's text
    pub fn input_changed(&mut self, value: impl Into<String>) {
        if self.lifecycle.update_draft(value) {
            self.last_error = None;
        }
    }

    /// Key pressed inside the editor input; Enter submits
    pub fn handle_editor_key(
        &mut self,
        event: &KeyEvent,
        confirmed: &[Tag],
    ) -> Option<Result<SubmitOutcome, SubmitError>> {
        event.is_enter().then(|| self.submit(confirmed))
    }

    /// Document-level key press; Escape closes this overlay's editor
    pub fn handle_global_key(&mut self, event: &KeyEvent) -> bool {
        if !event.is_escape() {
            return false;
        }
        let cancelled = self.lifecycle.cancel();
        if cancelled {
            self.last_error = None;
            self.focus_requested = false;
            debug!("editor closed on {}", self.image.image_id);
        }
        cancelled
    }

    pub fn submit(&mut self, confirmed: &[Tag]) -> Result<SubmitOutcome, SubmitError> {
        self.submit_at(confirmed, Instant::now())
    }

    /// Submit the open draft, stamping the request with `now`
    pub fn submit_at(
        &mut self,
        confirmed: &[Tag],
        now: Instant,
    ) -> Result<SubmitOutcome, SubmitError> {
        let ctx = SubmitContext {
            image: &self.image,
            confirmed,
            validator: self.validator.as_deref(),
            now,
        };
        let result = self.lifecycle.submit(ctx, &mut self.store);

        match &result {
            Ok(SubmitOutcome::Dispatched(_)) => {
                self.last_error = None;
                self.focus_requested = false;
            }
            Ok(SubmitOutcome::EmptyReset) => self.last_error = None,
            Err(SubmitError::NotEditing) => {}
            Err(err) => self.last_error = Some(err.clone()),
        }
        result
    }

    /// Reconcile with the confirmed tags supplied for this render
    pub fn sync(&mut self, confirmed: &[Tag]) -> Option<Resolution> {
        self.lifecycle.observe_confirmed(confirmed).cloned()
    }

    /// Report that the store rejected a pending add request
    pub fn fail_pending(&mut self, token: RequestToken, reason: impl Into<String>) -> bool {
        self.lifecycle.fail(token, reason)
    }

    /// Time out a pending add request if it is overdue
    pub fn expire(&mut self, now: Instant) -> bool {
        self.lifecycle.expire(now)
    }

    /// Consume a pending request to focus the editor input
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    /// Compute what to draw for `confirmed` plus local state
    pub fn view<'a>(&'a self, confirmed: &'a [Tag]) -> OverlayView<'a> {
        let transient = self.lifecycle.transient();
        let write_outstanding = transient.is_some();

        let mut tags: Vec<TagView<'a>> = confirmed
            .iter()
            .map(|tag| TagView {
                id: tag.id(),
                placement: to_anchored_offsets(tag.position()),
                transient: false,
                remove_muted: write_outstanding,
            })
            .collect();

        if let Some(transient) = transient {
            tags.push(TagView {
                id: transient.tag.id(),
                placement: to_anchored_offsets(transient.tag.position()),
                transient: true,
                remove_muted: true,
            });
        }

        // The lifecycle never holds a draft while a tag is pending
        let editor = self.lifecycle.draft().map(|draft| EditorView {
            placement: to_anchored_offsets(draft.position),
            value: draft.value.as_str(),
            autofocus: self.focus_requested,
            error: self.last_error.as_ref(),
        });

        OverlayView {
            tags,
            editor,
            write_outstanding,
        }
    }

    fn open_editor(&mut self, event: &PointerEvent) -> ClickOutcome {
        let position = match to_normalized(event.offset, event.target_size) {
            Ok(position) => position,
            Err(err) => {
                debug!("ignoring click: {}", err);
                return ClickOutcome::Ignored(err);
            }
        };

        match self.lifecycle.open_editor(position) {
            OpenOutcome::Opened => {
                self.focus_requested = true;
                ClickOutcome::EditorOpened(position)
            }
            OpenOutcome::Busy => ClickOutcome::Busy,
        }
    }

    fn remove(&mut self, key: &TagKey) -> ClickOutcome {
        if key.transient {
            debug!("refusing to remove transient tag '{}'", key.id);
            return ClickOutcome::RemoveRefused(key.id.clone());
        }
        self.lifecycle
            .request_removal(&mut self.store, &self.image, &key.id);
        ClickOutcome::RemoveRequested(key.id.clone())
    }
}

impl<S: TagStore> KeyListener for Overlay<S> {
    fn on_key(&mut self, event: &KeyEvent) -> bool {
        self.handle_global_key(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ContainerSize, HorizontalAnchor, PixelPoint, VerticalAnchor};
    use crate::overlay::events::Key;
    use crate::tags::{MemoryStore, RequestStatus, StoreRequest};
    use std::time::Duration;

    fn overlay() -> Overlay<MemoryStore> {
        Overlay::new(
            ImageRef::new("post-1", "image-1"),
            MemoryStore::new(),
            OverlayConfig::default(),
        )
    }

    fn click(x: f64, y: f64) -> PointerEvent {
        PointerEvent::surface(PixelPoint::new(x, y), ContainerSize::new(100.0, 100.0))
    }

    fn enter() -> KeyEvent {
        KeyEvent::new(Key::Enter)
    }

    #[test]
    fn test_click_opens_editor_with_focus() {
        let mut overlay = overlay();
        let outcome = overlay.handle_click(&click(20.0, 30.0));
        assert!(matches!(outcome, ClickOutcome::EditorOpened(_)));

        {
            let view = overlay.view(&[]);
            let editor = view.editor.as_ref().unwrap();
            assert!(editor.autofocus);
            assert_eq!(editor.value, "");
        }

        assert!(overlay.take_focus_request());
        assert!(!overlay.take_focus_request());
    }

    #[test]
    fn test_zero_area_click_is_ignored() {
        let mut overlay = overlay();
        let event = PointerEvent::surface(PixelPoint::new(5.0, 5.0), ContainerSize::new(0.0, 0.0));
        assert!(matches!(
            overlay.handle_click(&event),
            ClickOutcome::Ignored(GeometryError::DegenerateContainer { .. })
        ));
        assert!(overlay.lifecycle().is_idle());
    }

    #[test]
    fn test_tag_click_does_not_bubble() {
        let mut overlay = overlay();
        let outcome = overlay.handle_click(&PointerEvent::on(ClickTarget::Tag(TagKey::confirmed(
            "bob",
        ))));
        assert_eq!(outcome, ClickOutcome::TagClicked(TagKey::confirmed("bob")));
        assert!(overlay.view(&[]).editor.is_none());
    }

    #[test]
    fn test_remove_click() {
        let mut overlay = overlay();
        let outcome = overlay.handle_click(&PointerEvent::on(ClickTarget::RemoveAffordance(
            TagKey::confirmed("bob"),
        )));
        assert_eq!(outcome, ClickOutcome::RemoveRequested("bob".to_string()));
        assert!(overlay.lifecycle().is_idle());
        assert_eq!(
            overlay.store().pending(),
            &[StoreRequest::Remove {
                post_id: "post-1".to_string(),
                image_id: "image-1".to_string(),
                tag_id: "bob".to_string(),
            }]
        );
    }

    #[test]
    fn test_transient_remove_refused() {
        let mut overlay = overlay();
        let outcome = overlay.handle_click(&PointerEvent::on(ClickTarget::RemoveAffordance(
            TagKey::transient("alice"),
        )));
        assert_eq!(outcome, ClickOutcome::RemoveRefused("alice".to_string()));
        assert!(overlay.store().pending().is_empty());
    }

    #[test]
    fn test_enter_submits() {
        let mut overlay = overlay();
        overlay.handle_click(&click(20.0, 30.0));
        overlay.input_changed("alice");

        let result = overlay.handle_editor_key(&enter(), &[]).unwrap();
        assert_eq!(result, Ok(SubmitOutcome::Dispatched(RequestToken(1))));
        assert!(overlay
            .handle_editor_key(&KeyEvent::new(Key::from_identifier("a")), &[])
            .is_none());
    }

    #[test]
    fn test_pending_view() {
        let mut overlay = overlay();
        overlay.handle_click(&click(90.0, 10.0));
        overlay.input_changed("alice");
        overlay.submit(&[]).unwrap();

        let confirmed = vec![Tag::new("bob", 0.25, 0.75).unwrap()];
        let view = overlay.view(&confirmed);
        assert!(view.write_outstanding);
        assert!(view.editor.is_none());
        assert_eq!(view.tags.len(), 2);
        assert!(view.tag("bob").unwrap().remove_muted);

        let transient = view.transient().unwrap();
        assert_eq!(transient.id, "alice");
        assert!(matches!(
            transient.placement.horizontal,
            HorizontalAnchor::Right(_)
        ));
        assert!(matches!(transient.placement.vertical, VerticalAnchor::Top(_)));
    }

    #[test]
    fn test_rejected_submit_surfaces_error() {
        let mut overlay = Overlay::new(
            ImageRef::new("post-1", "image-1"),
            MemoryStore::new(),
            OverlayConfig::new().with_validate_mentions(true),
        );
        overlay.handle_click(&click(20.0, 30.0));
        overlay.input_changed(".bob");

        let err = overlay.submit(&[]).unwrap_err();
        assert!(matches!(err, SubmitError::InvalidFormat { .. }));
        assert_eq!(overlay.view(&[]).editor.unwrap().error, Some(&err));

        overlay.input_changed("bob");
        assert!(overlay.last_error().is_none());
    }

    #[test]
    fn test_custom_validator() {
        let mut overlay = overlay().with_validator(|value: &str| value.len() <= 3);
        overlay.handle_click(&click(20.0, 30.0));
        overlay.input_changed("alice");
        assert!(overlay.submit(&[]).is_err());
        overlay.input_changed("al");
        assert!(overlay.submit(&[]).is_ok());
    }

    #[test]
    fn test_overdue_request_unblocks_click() {
        let mut overlay = overlay();
        let start = Instant::now();
        overlay.handle_click_at(&click(20.0, 30.0), start);
        overlay.input_changed("alice");
        overlay.submit_at(&[], start).unwrap();

        // The store never confirms; unrelated tags come and go
        overlay.sync(&[Tag::new("bob", 0.1, 0.1).unwrap()]);
        assert_eq!(
            overlay.handle_click_at(&click(50.0, 50.0), start + Duration::from_secs(1)),
            ClickOutcome::Busy
        );

        let later = start + crate::overlay::config::DEFAULT_PENDING_TIMEOUT;
        assert!(matches!(
            overlay.handle_click_at(&click(50.0, 50.0), later),
            ClickOutcome::EditorOpened(_)
        ));
        assert!(matches!(
            overlay.lifecycle().last_resolution().unwrap().status,
            RequestStatus::Failed(_)
        ));
    }

    #[test]
    fn test_escape_closes_editor() {
        let mut overlay = overlay();
        assert!(!overlay.handle_global_key(&KeyEvent::new(Key::Escape)));

        overlay.handle_click(&click(20.0, 30.0));
        assert!(!overlay.handle_global_key(&enter()));
        assert!(overlay.handle_global_key(&KeyEvent::new(Key::Escape)));
        assert!(overlay.view(&[]).editor.is_none());
    }
}
