//! Tag creation lifecycle
//!
//! A tag goes through three states on its way to the store of record:
//!
//! - `Idle`: nothing is being created
//! - `Editing`: an editor draft is open at a clicked position
//! - `Pending`: the draft was submitted, an add request is in flight and an
//!   optimistic transient tag stands in for the real one
//!
//! Only one tag can be in creation at a time. While a request is pending,
//! clicks do not open a new editor, which also bounds the number of add
//! requests in flight to one.
//!
//! Each add request carries a [`RequestToken`]. The transient tag is cleared
//! once the request resolves: by a confirmed tag with the same identity
//! appearing, by an explicit failure, or by a timeout. The legacy length-diff
//! heuristic is available as [`ConfirmationPolicy::CountChange`].

use std::time::{Duration, Instant};

use log::{debug, info, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::geometry::NormalizedPoint;

use super::mention::TagValidator;
use super::store::{ImageRef, TagStore};
use super::types::{EditorDraft, RequestToken, Tag, TagError, TransientTag};

/// How a pending add request is recognized as confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationPolicy {
    /// A confirmed tag with the pending tag's id appeared
    #[default]
    MatchIdentity,
    /// The confirmed-tag count changed, whatever the cause
    CountChange,
}

/// Errors returned by [`TagLifecycle::submit`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    #[error("no editor is open")]
    NotEditing,

    #[error("'{value}' is not a valid username")]
    InvalidFormat { value: String },

    #[error("tag '{0}' already exists on this image")]
    DuplicateTag(String),

    #[error(transparent)]
    InvalidTag(#[from] TagError),
}

/// Result of a successful submit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// An add request was sent and a transient tag created
    Dispatched(RequestToken),
    /// The draft was empty; its value was reset and nothing was sent
    EmptyReset,
}

/// Result of a container click reaching the lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    Opened,
    /// A request is pending; the editor stays closed
    Busy,
}

/// Final status of an add request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestStatus {
    Sent { at: Instant },
    Confirmed,
    Failed(String),
}

/// An add request that left the pending state
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub token: RequestToken,
    pub tag_id: String,
    pub status: RequestStatus,
}

/// The single add request currently in flight
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub transient: TransientTag,
    pub status: RequestStatus,
}

impl PendingRequest {
    pub fn token(&self) -> RequestToken {
        self.transient.token
    }

    fn sent_at(&self) -> Option<Instant> {
        match self.status {
            RequestStatus::Sent { at } => Some(at),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleState {
    Idle,
    Editing(EditorDraft),
    Pending(PendingRequest),
}

/// Everything a submit needs from outside the state machine
pub struct SubmitContext<'a> {
    pub image: &'a ImageRef,
    /// Confirmed tags as last supplied by the caller
    pub confirmed: &'a [Tag],
    pub validator: Option<&'a dyn TagValidator>,
    pub now: Instant,
}

/// State machine owning the editor draft and the transient tag
#[derive(Debug)]
pub struct TagLifecycle {
    state: LifecycleState,
    policy: ConfirmationPolicy,
    pending_timeout: Option<Duration>,
    next_token: u64,
    observed_count: Option<usize>,
    last_resolution: Option<Resolution>,
}

impl Default for TagLifecycle {
    fn default() -> Self {
        Self::new(ConfirmationPolicy::default())
    }
}

impl TagLifecycle {
    pub fn new(policy: ConfirmationPolicy) -> Self {
        Self {
            state: LifecycleState::Idle,
            policy,
            pending_timeout: None,
            next_token: 1,
            observed_count: None,
            last_resolution: None,
        }
    }

    /// Fail pending requests that stay unconfirmed for longer than `timeout`
    pub fn with_pending_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.pending_timeout = timeout;
        self
    }

    pub fn state(&self) -> &LifecycleState {
        &self.state
    }

    pub fn policy(&self) -> ConfirmationPolicy {
        self.policy
    }

    pub fn draft(&self) -> Option<&EditorDraft> {
        match &self.state {
            LifecycleState::Editing(draft) => Some(draft),
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<&PendingRequest> {
        match &self.state {
            LifecycleState::Pending(request) => Some(request),
            _ => None,
        }
    }

    pub fn transient(&self) -> Option<&TransientTag> {
        self.pending().map(|request| &request.transient)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, LifecycleState::Idle)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, LifecycleState::Pending(_))
    }

    /// How the most recent add request ended
    pub fn last_resolution(&self) -> Option<&Resolution> {
        self.last_resolution.as_ref()
    }

    /// Open the editor at a clicked position
    ///
    /// Clicking elsewhere while already editing moves the draft and keeps
    /// its text.
    pub fn open_editor(&mut self, position: NormalizedPoint) -> OpenOutcome {
        match &mut self.state {
            LifecycleState::Pending(request) => {
                debug!(
                    "editor not opened: {} still pending",
                    request.transient.token
                );
                OpenOutcome::Busy
            }
            LifecycleState::Editing(draft) => {
                draft.position = position;
                OpenOutcome::Opened
            }
            LifecycleState::Idle => {
                self.state = LifecycleState::Editing(EditorDraft::new(position));
                OpenOutcome::Opened
            }
        }
    }

    /// Replace the draft text; ignored when no editor is open
    pub fn update_draft(&mut self, value: impl Into<String>) -> bool {
        match &mut self.state {
            LifecycleState::Editing(draft) => {
                draft.value = value.into();
                true
            }
            _ => false,
        }
    }

    /// Discard an open draft without sending anything
    pub fn cancel(&mut self) -> bool {
        if let LifecycleState::Editing(_) = self.state {
            self.state = LifecycleState::Idle;
            true
        } else {
            false
        }
    }

    /// Submit the open draft
    ///
    /// An empty draft is reset and left open. Otherwise the optional
    /// validator is consulted, the add request is sent to the store and a
    /// transient tag takes the draft's place. With a validator installed the
    /// id is sent trimmed, matching what the validator checked; without one
    /// it is sent exactly as typed.
    pub fn submit(
        &mut self,
        ctx: SubmitContext<'_>,
        store: &mut dyn TagStore,
    ) -> Result<SubmitOutcome, SubmitError> {
        let LifecycleState::Editing(draft) = &mut self.state else {
            return Err(SubmitError::NotEditing);
        };

        if draft.value.is_empty() {
            draft.value = String::new();
            debug!("ignoring empty tag submission");
            return Ok(SubmitOutcome::EmptyReset);
        }

        let value = draft.value.clone();
        let position = draft.position;

        let value = match ctx.validator {
            Some(validator) if !validator.is_valid(&value) => {
                return Err(SubmitError::InvalidFormat { value });
            }
            Some(_) => value.trim().to_string(),
            None => value,
        };
        if ctx.confirmed.iter().any(|tag| tag.id() == value) {
            return Err(SubmitError::DuplicateTag(value));
        }

        let tag = Tag::new(value, position.x, position.y)?;
        let token = self.issue_token();
        // Count-change confirmation needs a baseline even without a prior sync
        if self.observed_count.is_none() {
            self.observed_count = Some(ctx.confirmed.len());
        }

        store.add_tag(&ctx.image.post_id, &ctx.image.image_id, &tag, token);
        info!(
            "sent {} to add tag '{}' on {}/{}",
            token,
            tag.id(),
            ctx.image.post_id,
            ctx.image.image_id
        );

        self.state = LifecycleState::Pending(PendingRequest {
            transient: TransientTag { tag, token },
            status: RequestStatus::Sent { at: ctx.now },
        });
        Ok(SubmitOutcome::Dispatched(token))
    }

    /// Ask the store to remove a confirmed tag
    ///
    /// Does not change state; the removal shows up in a later collection.
    pub fn request_removal(&self, store: &mut dyn TagStore, image: &ImageRef, tag_id: &str) {
        store.remove_tag(&image.post_id, &image.image_id, tag_id);
        info!(
            "requested removal of tag '{}' on {}/{}",
            tag_id, image.post_id, image.image_id
        );
    }

    /// Reconcile with a newly supplied confirmed-tag collection
    ///
    /// Returns the resolution if this observation confirmed the pending
    /// request.
    pub fn observe_confirmed(&mut self, confirmed: &[Tag]) -> Option<&Resolution> {
        let previous = self.observed_count.replace(confirmed.len());

        let LifecycleState::Pending(request) = &self.state else {
            return None;
        };

        let confirmed_now = match self.policy {
            ConfirmationPolicy::MatchIdentity => confirmed
                .iter()
                .any(|tag| tag.id() == request.transient.tag.id()),
            ConfirmationPolicy::CountChange => {
                previous.is_some_and(|count| count != confirmed.len())
            }
        };

        if !confirmed_now {
            return None;
        }

        info!(
            "{} confirmed for tag '{}'",
            request.transient.token,
            request.transient.tag.id()
        );
        self.resolve(RequestStatus::Confirmed)
    }

    /// Mark the pending request as failed
    ///
    /// Nothing already sent is rolled back. Returns false when `token` is not
    /// the pending request.
    pub fn fail(&mut self, token: RequestToken, reason: impl Into<String>) -> bool {
        if self.pending().map(PendingRequest::token) != Some(token) {
            return false;
        }
        let reason = reason.into();
        warn!("{} failed: {}", token, reason);
        self.resolve(RequestStatus::Failed(reason));
        true
    }

    /// Fail the pending request if it outlived the configured timeout
    pub fn expire(&mut self, now: Instant) -> bool {
        let Some(timeout) = self.pending_timeout else {
            return false;
        };
        let Some(request) = self.pending() else {
            return false;
        };
        let Some(sent_at) = request.sent_at() else {
            return false;
        };

        if now.saturating_duration_since(sent_at) < timeout {
            return false;
        }
        let token = request.token();
        self.fail(token, format!("no confirmation after {:?}", timeout))
    }

    fn resolve(&mut self, status: RequestStatus) -> Option<&Resolution> {
        let LifecycleState::Pending(request) =
            std::mem::replace(&mut self.state, LifecycleState::Idle)
        else {
            return None;
        };
        self.last_resolution = Some(Resolution {
            token: request.transient.token,
            tag_id: request.transient.tag.id().to_string(),
            status,
        });
        self.last_resolution.as_ref()
    }

    fn issue_token(&mut self) -> RequestToken {
        let token = RequestToken(self.next_token);
        self.next_token += 1;
        token
    }
}
