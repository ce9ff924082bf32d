//! `stringMatching` — regex matching on the text form of primitives
//!
//! Uses the Rust `regex` crate, which guarantees linear-time matching. Pattern
//! length is capped at [`MAX_REGEX_PATTERN_LENGTH`] to bound compile cost.

use regex::Regex;

use crate::{
    AsymmetricMatcher, MatchContext, MatcherError, PrettyPrinter, Value, MAX_REGEX_PATTERN_LENGTH,
};

/// Matches strings, numbers and booleans whose text form matches a regex.
/// Every other kind never matches.
///
/// The pattern is unanchored: `"ell"` matches `"hello"`.
///
/// # Example
///
/// ```
/// use expecta::{MatchersUtil, StringMatching, AsymmetricMatcher, Value};
///
/// let matcher = StringMatching::new(r"^foo\d$").unwrap();
/// let ctx = MatchersUtil::new().context();
/// assert!(matcher.asymmetric_match(&Value::from("foo1"), &ctx));
/// assert!(!matcher.asymmetric_match(&Value::from("a-foo1"), &ctx));
/// ```
#[derive(Debug, Clone)]
pub struct StringMatching {
    regex: Regex,
}

impl StringMatching {
    /// Compile `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::PatternTooLong`] if the pattern exceeds
    /// [`MAX_REGEX_PATTERN_LENGTH`], or [`MatcherError::InvalidPattern`] if it
    /// does not compile.
    pub fn new(pattern: &str) -> Result<Self, MatcherError> {
        if pattern.len() > MAX_REGEX_PATTERN_LENGTH {
            return Err(MatcherError::PatternTooLong {
                len: pattern.len(),
                max: MAX_REGEX_PATTERN_LENGTH,
            });
        }
        let regex = Regex::new(pattern).map_err(|e| MatcherError::InvalidPattern {
            pattern: pattern.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self { regex })
    }

    /// Wrap an already compiled regex.
    #[must_use]
    pub fn from_regex(regex: Regex) -> Self {
        Self { regex }
    }

    /// The pattern source.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

impl AsymmetricMatcher for StringMatching {
    fn asymmetric_match(&self, actual: &Value, _ctx: &MatchContext) -> bool {
        actual
            .to_text()
            .is_some_and(|text| self.regex.is_match(&text))
    }

    // The pattern has no `Value` form, so it is shown as-is.
    fn jasmine_to_string(&self, _pp: &dyn PrettyPrinter) -> String {
        format!("<jasmine.stringMatching(/{}/)>", self.regex.as_str())
    }
}

/// `stringMatching(pattern)` as an expected value.
///
/// # Errors
///
/// See [`StringMatching::new`].
pub fn string_matching(pattern: &str) -> Result<Value, MatcherError> {
    StringMatching::new(pattern).map(Value::matcher)
}

// ═══════════════════════════════════════════════════════════════════════════════
// IntoAsymmetricMatcher impl (feature = "registry")
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "registry")]
mod into_asymmetric_matcher {
    use std::sync::Arc;

    use super::StringMatching;
    use crate::config::StringMatchingConfig;
    use crate::registry::{IntoAsymmetricMatcher, Registry};
    use crate::{AsymmetricMatcher, MatcherError};

    impl IntoAsymmetricMatcher for StringMatching {
        type Config = StringMatchingConfig;

        fn from_config(
            config: Self::Config,
            _registry: &Registry,
        ) -> Result<Arc<dyn AsymmetricMatcher>, MatcherError> {
            Ok(Arc::new(StringMatching::new(&config.pattern)?))
        }
    }
}
