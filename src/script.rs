//! Event scripts that drive an overlay from start to finish
//!
//! A script names the image, its rendered size, the confirmed tags the store
//! starts with, and a list of host events:
//!
//! ```toml
//! post_id = "post-1"
//! image_id = "image-1"
//! container = { width = 600, height = 400 }
//! tags = [{ id = "bob", x = 0.1, y = 0.2 }]
//!
//! [[events]]
//! kind = "click"
//! x = 120
//! y = 80
//!
//! [[events]]
//! kind = "input"
//! value = "alice"
//!
//! [[events]]
//! kind = "key"
//! key = "Enter"
//!
//! [[events]]
//! kind = "flush"
//! ```
//!
//! Events are replayed against an [`Overlay`] backed by a [`MemoryStore`],
//! with a virtual clock that only advances on `wait` events.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use log::debug;
use serde::Deserialize;

use crate::error::ScriptError;
use crate::geometry::{ContainerSize, PixelPoint};
use crate::overlay::{
    ClickOutcome, ClickTarget, Key, KeyEvent, KeyboardHub, Overlay, OverlayConfig, PointerEvent,
    Subscription, TagKey,
};
use crate::renderer::{render_html_with_theme, HtmlConfig};
use crate::settings::Settings;
use crate::tags::{
    validate_collection, FlushReport, ImageRef, MemoryStore, SubmitError, SubmitOutcome, Tag,
    TagError, TagRecord,
};

/// A parsed event script
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    pub post_id: String,
    pub image_id: String,
    #[serde(default = "default_container")]
    pub container: ContainerSize,
    #[serde(default)]
    pub tags: Vec<TagRecord>,
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

fn default_container() -> ContainerSize {
    ContainerSize::new(600.0, 400.0)
}

/// One host event
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptEvent {
    /// Click on the image surface at a pixel offset
    Click { x: f64, y: f64 },
    /// Click on the body of a rendered tag
    TagClick {
        tag: String,
        #[serde(default)]
        transient: bool,
    },
    /// Click on a tag's remove affordance
    Remove {
        tag: String,
        #[serde(default)]
        transient: bool,
    },
    /// The editor input's text changed
    Input { value: String },
    /// Key pressed in the editor; Escape goes to the document instead
    Key { key: String },
    /// Document-level Escape
    Escape,
    /// The store applies queued requests and publishes its tags
    Flush,
    /// The store rejects the next add request it applies
    FailNext,
    /// Advance the virtual clock
    Wait { ms: u64 },
}

/// What replaying one event did
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Click(ClickOutcome),
    Input,
    Submit(Result<SubmitOutcome, SubmitError>),
    KeyIgnored,
    Escape { cancelled: usize },
    Flush(FlushReport),
    FailNextArmed,
    Wait { expired: bool },
}

/// Record of one replayed event
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub event: ScriptEvent,
    pub outcome: StepOutcome,
    /// Markup after the event, when tracing
    pub html: Option<String>,
}

/// Result of a full replay
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayReport {
    pub steps: Vec<Step>,
    /// Confirmed tags held by the store at the end
    pub confirmed: Vec<Tag>,
    pub html: String,
}

impl Script {
    /// Parse a script from TOML
    pub fn from_str(content: &str) -> Result<Self, ScriptError> {
        let script: Script = toml::from_str(content)?;
        script.validate()?;
        Ok(script)
    }

    fn validate(&self) -> Result<(), ScriptError> {
        if self.post_id.is_empty() || self.image_id.is_empty() {
            return Err(ScriptError::invalid("post_id and image_id must not be empty"));
        }
        for (index, event) in self.events.iter().enumerate() {
            match event {
                ScriptEvent::Click { x, y } if !x.is_finite() || !y.is_finite() => {
                    return Err(ScriptError::invalid_event(
                        index,
                        "click coordinates must be finite",
                    ));
                }
                ScriptEvent::Key { key } if key.is_empty() => {
                    return Err(ScriptError::invalid_event(index, "key must not be empty"));
                }
                ScriptEvent::TagClick { tag, .. } | ScriptEvent::Remove { tag, .. }
                    if tag.is_empty() =>
                {
                    return Err(ScriptError::invalid_event(index, "tag must not be empty"));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Replays a script against a live overlay
pub struct Replayer {
    overlay: Rc<RefCell<Overlay<MemoryStore>>>,
    hub: KeyboardHub,
    _subscription: Subscription,
    image: ImageRef,
    container: ContainerSize,
    confirmed: Vec<Tag>,
    clock: Instant,
}

impl Replayer {
    /// Set up an overlay seeded with the script's confirmed tags
    pub fn new(script: &Script, config: OverlayConfig) -> Result<Self, TagError> {
        let confirmed = validate_collection(script.tags.iter().cloned())?;
        let image = ImageRef::new(script.post_id.clone(), script.image_id.clone());
        let store = MemoryStore::new().with_tags(
            image.post_id.clone(),
            image.image_id.clone(),
            confirmed.clone(),
        );

        let mut overlay = Overlay::new(image.clone(), store, config);
        overlay.sync(&confirmed);
        let overlay = Rc::new(RefCell::new(overlay));

        let hub = KeyboardHub::new();
        let subscription = Overlay::mount(&overlay, &hub);

        Ok(Self {
            overlay,
            hub,
            _subscription: subscription,
            image,
            container: script.container,
            confirmed,
            clock: Instant::now(),
        })
    }

    pub fn confirmed(&self) -> &[Tag] {
        &self.confirmed
    }

    /// Apply one event
    pub fn apply(&mut self, event: &ScriptEvent) -> StepOutcome {
        debug!("replaying {:?}", event);
        match event {
            ScriptEvent::Click { x, y } => {
                let pointer = PointerEvent::surface(PixelPoint::new(*x, *y), self.container);
                StepOutcome::Click(
                    self.overlay
                        .borrow_mut()
                        .handle_click_at(&pointer, self.clock),
                )
            }
            ScriptEvent::TagClick { tag, transient } => {
                let target = ClickTarget::Tag(tag_key(tag, *transient));
                StepOutcome::Click(
                    self.overlay
                        .borrow_mut()
                        .handle_click(&PointerEvent::on(target)),
                )
            }
            ScriptEvent::Remove { tag, transient } => {
                let target = ClickTarget::RemoveAffordance(tag_key(tag, *transient));
                StepOutcome::Click(
                    self.overlay
                        .borrow_mut()
                        .handle_click(&PointerEvent::on(target)),
                )
            }
            ScriptEvent::Input { value } => {
                self.overlay.borrow_mut().input_changed(value.clone());
                StepOutcome::Input
            }
            ScriptEvent::Key { key } => match Key::from_identifier(key) {
                Key::Escape => self.escape(),
                Key::Enter => StepOutcome::Submit(
                    self.overlay
                        .borrow_mut()
                        .submit_at(&self.confirmed, self.clock),
                ),
                Key::Other(_) => StepOutcome::KeyIgnored,
            },
            ScriptEvent::Escape => self.escape(),
            ScriptEvent::Flush => self.flush(),
            ScriptEvent::FailNext => {
                self.overlay.borrow_mut().store_mut().fail_next_add();
                StepOutcome::FailNextArmed
            }
            ScriptEvent::Wait { ms } => {
                self.clock += Duration::from_millis(*ms);
                let expired = self.overlay.borrow_mut().expire(self.clock);
                StepOutcome::Wait { expired }
            }
        }
    }

    /// Render the overlay as it currently stands
    pub fn render(&self, html: &HtmlConfig, settings: &Settings) -> String {
        let overlay = self.overlay.borrow();
        render_html_with_theme(&overlay.view(&self.confirmed), html, &settings.theme)
    }

    fn escape(&mut self) -> StepOutcome {
        let cancelled = self.hub.dispatch(&KeyEvent::new(Key::Escape));
        StepOutcome::Escape { cancelled }
    }

    fn flush(&mut self) -> StepOutcome {
        let mut overlay = self.overlay.borrow_mut();
        let report = overlay.store_mut().flush();
        for token in &report.failed {
            overlay.fail_pending(*token, "rejected by store");
        }
        self.confirmed = overlay
            .store()
            .tags(&self.image.post_id, &self.image.image_id)
            .to_vec();
        overlay.sync(&self.confirmed);
        StepOutcome::Flush(report)
    }
}

fn tag_key(id: &str, transient: bool) -> TagKey {
    if transient {
        TagKey::transient(id)
    } else {
        TagKey::confirmed(id)
    }
}

/// Replay every event in `script` and render the final state
pub fn run(script: &Script, settings: &Settings, trace: bool) -> Result<ReplayReport, TagError> {
    let mut replayer = Replayer::new(script, settings.overlay.clone())?;

    let steps = script
        .events
        .iter()
        .map(|event| {
            let outcome = replayer.apply(event);
            let html = trace.then(|| replayer.render(&settings.html, settings));
            Step {
                event: event.clone(),
                outcome,
                html,
            }
        })
        .collect();

    Ok(ReplayReport {
        steps,
        html: replayer.render(&settings.html, settings),
        confirmed: replayer.confirmed.clone(),
    })
}
