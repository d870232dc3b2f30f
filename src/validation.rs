//! Client-side form validation. Forms are checked before any request is sent;
//! every failing field collects its own messages.

use crate::error::ValidationErrors;
use regex::Regex;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
const CACHE_KEY_PATTERN: &str = r"^[a-zA-Z0-9:_-]+$";

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Length bounds for a text field, counted in characters, with the messages
/// shown when either bound fails.
pub struct TextRule {
    pub min: usize,
    pub max: usize,
    pub too_short: &'static str,
    pub too_long: &'static str,
}

impl TextRule {
    pub fn check(&self, errors: &mut ValidationErrors, field: &str, value: &str) {
        let len = value.chars().count();
        if len < self.min {
            errors.add(field, self.too_short);
        } else if len > self.max {
            errors.add(field, self.too_long);
        }
    }
}

/// Inclusive numeric bounds.
pub struct RangeRule {
    pub min: i64,
    pub max: i64,
    pub too_small: &'static str,
    pub too_large: &'static str,
}

impl RangeRule {
    pub fn check(&self, errors: &mut ValidationErrors, field: &str, value: i64) {
        if value < self.min {
            errors.add(field, self.too_small);
        } else if value > self.max {
            errors.add(field, self.too_large);
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    matches_pattern(EMAIL_PATTERN, email)
}

/// Conservative key charset: any string is a legal key server-side, but keys
/// outside this set are awkward to type and to put in a path.
pub fn is_valid_cache_key(key: &str) -> bool {
    matches_pattern(CACHE_KEY_PATTERN, key)
}

/// Trimmed, non-empty.
pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

fn matches_pattern(pattern: &str, value: &str) -> bool {
    match Regex::new(pattern) {
        Ok(re) => re.is_match(value),
        Err(e) => {
            tracing::warn!(pattern, error = %e, "invalid validation pattern");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(is_valid_email("ana@example.com"));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("ana example@x.io"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn cache_key_charset() {
        assert!(is_valid_cache_key("session:user_1-a"));
        assert!(!is_valid_cache_key("with space"));
        assert!(!is_valid_cache_key(""));
    }

    #[test]
    fn text_rule_counts_chars_not_bytes() {
        let rule = TextRule { min: 2, max: 3, too_short: "curto", too_long: "longo" };
        let mut errors = ValidationErrors::new();
        rule.check(&mut errors, "nome", "çã");
        assert!(errors.is_empty());
        rule.check(&mut errors, "nome", "a");
        rule.check(&mut errors, "outro", "abcd");
        assert_eq!(errors.field("nome"), ["curto".to_string()]);
        assert_eq!(errors.field("outro"), ["longo".to_string()]);
    }

    #[test]
    fn range_rule_is_inclusive() {
        let rule = RangeRule { min: 1, max: 150, too_small: "min", too_large: "max" };
        let mut errors = ValidationErrors::new();
        rule.check(&mut errors, "idade", 1);
        rule.check(&mut errors, "idade", 150);
        assert!(errors.is_empty());
        rule.check(&mut errors, "idade", 0);
        assert_eq!(errors.field("idade").len(), 1);
    }
}
