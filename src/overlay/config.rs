//! Configuration for the overlay controller

use std::time::Duration;

use serde::Deserialize;

use crate::tags::ConfirmationPolicy;

/// How long an unconfirmed add request blocks the editor by default
pub const DEFAULT_PENDING_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration options for an overlay instance
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "TomlOverlayConfig")]
pub struct OverlayConfig {
    /// How a pending add request is recognized as confirmed
    pub confirmation: ConfirmationPolicy,

    /// Reject submissions that are not valid mention-style usernames
    pub validate_mentions: bool,

    /// Give up on a pending add request after this long
    ///
    /// Defaults to [`DEFAULT_PENDING_TIMEOUT`]. `None` waits indefinitely.
    pub pending_timeout: Option<Duration>,
}

/// TOML shape of [`OverlayConfig`]
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TomlOverlayConfig {
    confirmation: ConfirmationPolicy,
    validate_mentions: bool,
    pending_timeout_ms: Option<u64>,
}

impl From<TomlOverlayConfig> for OverlayConfig {
    fn from(raw: TomlOverlayConfig) -> Self {
        Self {
            confirmation: raw.confirmation,
            validate_mentions: raw.validate_mentions,
            pending_timeout: Some(
                raw.pending_timeout_ms
                    .map_or(DEFAULT_PENDING_TIMEOUT, Duration::from_millis),
            ),
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            confirmation: ConfirmationPolicy::MatchIdentity,
            validate_mentions: false,
            pending_timeout: Some(DEFAULT_PENDING_TIMEOUT),
        }
    }
}

impl OverlayConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the confirmation policy
    pub fn with_confirmation(mut self, policy: ConfirmationPolicy) -> Self {
        self.confirmation = policy;
        self
    }

    /// Enable or disable mention validation on submit
    pub fn with_validate_mentions(mut self, validate: bool) -> Self {
        self.validate_mentions = validate;
        self
    }

    /// Set the pending request timeout
    pub fn with_pending_timeout(mut self, timeout: Duration) -> Self {
        self.pending_timeout = Some(timeout);
        self
    }

    /// Keep pending add requests until they are confirmed or failed
    pub fn without_pending_timeout(mut self) -> Self {
        self.pending_timeout = None;
        self
    }
}
