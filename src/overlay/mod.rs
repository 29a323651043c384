//! Overlay controller tying the coordinate mapper and the tag lifecycle to
//! host events and rendering

pub mod config;
pub mod controller;
pub mod events;
pub mod keyboard;
pub mod view;

pub use config::{OverlayConfig, DEFAULT_PENDING_TIMEOUT};
pub use controller::{ClickOutcome, Overlay};
pub use events::{ClickTarget, Key, KeyEvent, PointerEvent, TagKey};
pub use keyboard::{KeyListener, KeyboardHub, ListenerId, Subscription};
pub use view::{EditorView, OverlayView, TagView};
