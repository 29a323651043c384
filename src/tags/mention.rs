//! Username format checks for tag identifiers

use once_cell::sync::Lazy;
use regex::Regex;

/// First character alphanumeric or underscore, then alphanumerics,
/// underscores or periods
static MENTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[a-z0-9_][a-z0-9_.]*$").expect("mention pattern should compile")
});

/// Check a mention-style username
///
/// Surrounding whitespace is ignored; empty input is invalid.
pub fn validate_instagram_mention(mention: &str) -> bool {
    if mention.is_empty() {
        return false;
    }
    MENTION_PATTERN.is_match(mention.trim())
}

/// Check an untyped value; anything that is not a string is invalid
pub fn validate_mention_value(value: &toml::Value) -> bool {
    match value {
        toml::Value::String(s) => validate_instagram_mention(s),
        _ => false,
    }
}

/// Predicate consulted before an add request is dispatched
pub trait TagValidator {
    fn is_valid(&self, value: &str) -> bool;
}

impl<F> TagValidator for F
where
    F: Fn(&str) -> bool,
{
    fn is_valid(&self, value: &str) -> bool {
        self(value)
    }
}

/// Validator backed by [`validate_instagram_mention`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MentionValidator;

impl TagValidator for MentionValidator {
    fn is_valid(&self, value: &str) -> bool {
        validate_instagram_mention(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_mentions() {
        assert!(validate_instagram_mention("bob.doe_99"));
        assert!(validate_instagram_mention("_hidden"));
        assert!(validate_instagram_mention("ALICE"));
        assert!(validate_instagram_mention("  padded  "));
    }

    #[test]
    fn test_invalid_mentions() {
        assert!(!validate_instagram_mention(""));
        assert!(!validate_instagram_mention(" "));
        assert!(!validate_instagram_mention(".bob"));
        assert!(!validate_instagram_mention("bob doe"));
        assert!(!validate_instagram_mention("bob-doe"));
        assert!(!validate_instagram_mention("bob!"));
    }

    #[test]
    fn test_untyped_values() {
        assert!(validate_mention_value(&toml::Value::String("bob".into())));
        assert!(!validate_mention_value(&toml::Value::Integer(123)));
        assert!(!validate_mention_value(&toml::Value::Boolean(true)));
        assert!(!validate_mention_value(&toml::Value::Array(vec![])));
    }

    #[test]
    fn test_closure_validator() {
        let short = |value: &str| value.len() <= 3;
        assert!(short.is_valid("bob"));
        assert!(!short.is_valid("alice"));
        assert!(MentionValidator.is_valid("alice"));
    }
}
