//! Tag Overlay - Clickable person tags layered over an image
//!
//! This library maps clicks to resolution-independent positions, drives the
//! creation of a tag through an editor and a pending store request, and
//! renders the result as HTML.
//!
//! # Example
//!
//! ```rust
//! use tag_overlay::replay;
//!
//! let html = replay(r#"
//!     post_id = "post-1"
//!     image_id = "image-1"
//!     tags = [{ id = "bob", x = 0.25, y = 0.75 }]
//! "#).unwrap();
//!
//! assert!(html.contains(r#"data-tag-id="bob""#));
//! assert!(html.contains("left: 25%; bottom: 25%;"));
//! ```

pub mod error;
pub mod geometry;
pub mod overlay;
pub mod renderer;
pub mod script;
pub mod settings;
pub mod tags;
pub mod theme;

pub use error::ScriptError;
pub use geometry::{
    to_anchored_offsets, to_normalized, ContainerSize, GeometryError, NormalizedPoint,
    PixelPoint, Placement,
};
pub use overlay::{ClickOutcome, KeyboardHub, Overlay, OverlayConfig, OverlayView};
pub use renderer::{render_html, render_html_with_theme, HtmlConfig};
pub use script::{ReplayReport, Script, ScriptEvent};
pub use settings::{Settings, SettingsError};
pub use tags::{
    validate_instagram_mention, ConfirmationPolicy, ImageRef, MemoryStore, RequestToken, Tag,
    TagError, TagLifecycle, TagStore,
};
pub use theme::Theme;

use thiserror::Error;

/// Errors that can occur while replaying a script
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error(transparent)]
    Script(#[from] ScriptError),

    /// The script's seed tags are not a valid collection
    #[error("invalid seed tags: {0}")]
    Tags(#[from] TagError),
}

/// Replay an event script with default settings and return the final markup
pub fn replay(source: &str) -> Result<String, ReplayError> {
    Ok(replay_with_settings(source, &Settings::default(), false)?.html)
}

/// Replay an event script with custom settings
///
/// With `trace` set, every step also carries the markup rendered right
/// after it.
///
/// # Example
///
/// ```rust
/// use tag_overlay::{replay_with_settings, Settings};
///
/// let settings = Settings::from_str("[html]\nclass_prefix = \"ig-\"").unwrap();
/// let report = replay_with_settings(r#"
///     post_id = "post-1"
///     image_id = "image-1"
///
///     [[events]]
///     kind = "click"
///     x = 300
///     y = 100
/// "#, &settings, false).unwrap();
///
/// assert_eq!(report.steps.len(), 1);
/// assert!(report.html.contains(r#"class="ig-editor""#));
/// ```
pub fn replay_with_settings(
    source: &str,
    settings: &Settings,
    trace: bool,
) -> Result<ReplayReport, ReplayError> {
    let script = Script::from_str(source)?;
    log::info!(
        "replaying {} events on {}/{}",
        script.events.len(),
        script.post_id,
        script.image_id
    );
    Ok(script::run(&script, settings, trace)?)
}
