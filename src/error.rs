//! Error types for event scripts

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("failed to parse script: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid script: {reason}")]
    Invalid { reason: String },

    #[error("event {index}: {reason}")]
    InvalidEvent { index: usize, reason: String },
}

impl ScriptError {
    /// Create an invalid script error
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }

    /// Create an error pointing at one event
    pub fn invalid_event(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidEvent {
            index,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_event_display() {
        let err = ScriptError::invalid_event(3, "negative wait");
        assert_eq!(err.to_string(), "event 3: negative wait");
    }

    #[test]
    fn test_parse_error_display() {
        let err: ScriptError = toml::from_str::<toml::Value>("= nope").unwrap_err().into();
        assert!(err.to_string().starts_with("failed to parse script"));
    }
}
