//! Tags, their creation lifecycle and the store boundary

pub mod lifecycle;
pub mod mention;
pub mod store;
pub mod types;

pub use lifecycle::{
    ConfirmationPolicy, LifecycleState, OpenOutcome, PendingRequest, RequestStatus, Resolution,
    SubmitContext, SubmitError, SubmitOutcome, TagLifecycle,
};
pub use mention::{
    validate_instagram_mention, validate_mention_value, MentionValidator, TagValidator,
};
pub use store::{FlushReport, ImageRef, MemoryStore, StoreRequest, TagStore};
pub use types::{
    validate_collection, EditorDraft, RequestToken, Tag, TagError, TagRecord, TransientTag,
};
