//! expecta-test: Conformance fixtures and reference extension
//!
//! Provides named custom equality testers and a user-defined asymmetric
//! matcher for conformance testing. This is the reference extension that
//! demonstrates how to build expecta extensions.
//!
//! # Example
//!
//! ```
//! use expecta_test::prelude::*;
//!
//! let util = MatchersUtil::new();
//! util.add_custom_tester(string_coercion);
//!
//! // 1 and "1" are equal under the string-coercion tester
//! assert!(util.equals(&Value::from(1), &Value::from("1")));
//!
//! // DivisibleBy is an ordinary asymmetric matcher
//! let even = Value::matcher(DivisibleBy::new(2.0).unwrap());
//! assert!(util.equals(&even, &Value::from(10)));
//! ```

use std::sync::Arc;

use expecta::prelude::*;

#[cfg(feature = "fixtures")]
pub mod fixture;

// ═══════════════════════════════════════════════════════════════════════════════
// Named testers
// ═══════════════════════════════════════════════════════════════════════════════

/// A number and a string are equal when the number's text is the string.
///
/// Declines every other pair, so structural equality still applies to them.
pub fn string_coercion(expected: &Value, actual: &Value, _util: &MatchersUtil) -> Option<bool> {
    match (expected, actual) {
        (Value::Number(_), Value::String(_)) | (Value::String(_), Value::Number(_)) => {
            Some(expected.to_text() == actual.to_text())
        }
        _ => None,
    }
}

/// Strings are equal ignoring ASCII case.
pub fn case_insensitive(expected: &Value, actual: &Value, _util: &MatchersUtil) -> Option<bool> {
    match (expected.as_str(), actual.as_str()) {
        (Some(e), Some(a)) => Some(e.eq_ignore_ascii_case(a)),
        _ => None,
    }
}

/// Look up a tester by the name fixtures use for it.
#[must_use]
pub fn tester(name: &str) -> Option<Arc<dyn CustomEqualityTester>> {
    let tester: Arc<dyn CustomEqualityTester> = match name {
        "string_coercion" => Arc::new(string_coercion),
        "case_insensitive" => Arc::new(case_insensitive),
        _ => return None,
    };
    Some(tester)
}

// ═══════════════════════════════════════════════════════════════════════════════
// DivisibleBy
// ═══════════════════════════════════════════════════════════════════════════════

/// Matches numbers that are a whole multiple of the divisor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DivisibleBy {
    divisor: f64,
}

impl DivisibleBy {
    /// Create the matcher.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::InvalidConfig`] for a zero or non-finite divisor.
    pub fn new(divisor: f64) -> Result<Self, MatcherError> {
        if divisor == 0.0 || !divisor.is_finite() {
            return Err(MatcherError::InvalidConfig {
                reason: format!("divisor must be a finite non-zero number, got {divisor}"),
            });
        }
        Ok(Self { divisor })
    }

    /// The divisor.
    #[must_use]
    pub fn divisor(&self) -> f64 {
        self.divisor
    }
}

impl AsymmetricMatcher for DivisibleBy {
    fn asymmetric_match(&self, actual: &Value, _ctx: &MatchContext) -> bool {
        actual
            .as_number()
            .is_some_and(|n| n.is_finite() && n % self.divisor == 0.0)
    }

    fn jasmine_to_string(&self, _pp: &dyn PrettyPrinter) -> String {
        format!("<divisibleBy({})>", self.divisor)
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{case_insensitive, string_coercion, tester, DivisibleBy};
    pub use expecta::prelude::*;
}

// ═══════════════════════════════════════════════════════════════════════════════
// Registry support (feature = "registry")
// ═══════════════════════════════════════════════════════════════════════════════

/// Configuration for [`DivisibleBy`].
#[cfg(feature = "registry")]
#[derive(serde::Deserialize)]
pub struct DivisibleByConfig {
    /// The divisor.
    pub divisor: f64,
}

#[cfg(feature = "registry")]
impl expecta::IntoAsymmetricMatcher for DivisibleBy {
    type Config = DivisibleByConfig;

    fn from_config(
        config: Self::Config,
        _registry: &expecta::Registry,
    ) -> Result<Arc<dyn AsymmetricMatcher>, MatcherError> {
        Ok(Arc::new(DivisibleBy::new(config.divisor)?))
    }
}

/// Register all expecta-test types with the given builder.
///
/// Registers the core matchers plus:
/// - `expecta.test.v1.DivisibleBy` → [`DivisibleBy`]
#[cfg(feature = "registry")]
#[must_use]
pub fn register(builder: expecta::RegistryBuilder) -> expecta::RegistryBuilder {
    expecta::register_core_matchers(builder).matcher::<DivisibleBy>("expecta.test.v1.DivisibleBy")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_coercion_only_decides_number_string_pairs() {
        let util = MatchersUtil::new();
        let (one, text) = (Value::from(1), Value::from("1"));
        assert_eq!(string_coercion(&one, &text, &util), Some(true));
        assert_eq!(string_coercion(&text, &Value::from(2), &util), Some(false));
        assert_eq!(string_coercion(&one, &one, &util), None);
    }

    #[test]
    fn named_tester_lookup() {
        let util = MatchersUtil::new();
        let tester = tester("case_insensitive").unwrap();
        let (upper, lower) = (Value::from("A"), Value::from("a"));
        assert_eq!(tester.test(&upper, &lower, &util), Some(true));
        assert!(super::tester("nope").is_none());
    }

    #[test]
    fn divisible_by() {
        let util = MatchersUtil::new();
        let by_three = Value::matcher(DivisibleBy::new(3.0).unwrap());
        assert!(util.equals(&by_three, &Value::from(9)));
        assert!(!util.equals(&by_three, &Value::from(10)));
        assert!(!util.equals(&by_three, &Value::from("9")));
        assert_eq!(util.pp(&by_three), "<divisibleBy(3)>");
        assert!(DivisibleBy::new(0.0).is_err());
    }

    #[cfg(feature = "registry")]
    #[test]
    fn register_adds_divisible_by() {
        let registry = register(expecta::RegistryBuilder::new()).build();
        assert!(registry.contains_matcher("expecta.test.v1.DivisibleBy"));
        assert!(registry.contains_matcher("expecta.v1.Any"));

        let value = registry
            .load_value(&serde_json::json!({
                "$matcher": {
                    "type_url": "expecta.test.v1.DivisibleBy",
                    "config": { "divisor": 4 }
                }
            }))
            .unwrap();
        assert!(MatchersUtil::new().equals(&value, &Value::from(12)));

        let err = registry
            .load_value(&serde_json::json!({
                "$matcher": {
                    "type_url": "expecta.test.v1.DivisibleBy",
                    "config": { "divisor": 0 }
                }
            }))
            .unwrap_err();
        assert!(matches!(err, MatcherError::InvalidConfig { .. }));
    }
}
