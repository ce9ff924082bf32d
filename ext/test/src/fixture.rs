//! Conformance test fixture runner
//!
//! Loads YAML fixtures and runs them against the expecta engine. Values in a
//! fixture are value documents, loaded through the [`Registry`], so they can
//! use the reserved forms (`$map`, `$set`, `$matcher`, ...).
//!
//! ```yaml
//! name: map_containing
//! description: mapContaining matches a subset of entries
//! testers: [string_coercion]
//! cases:
//!   - name: present pair
//!     expected: { $matcher: { type_url: expecta.v1.MapContaining, config: { sample: { $map: [[a, 1]] } } } }
//!     actual: { $map: [[a, "1"], [b, 2]] }
//!     pass: true
//! ```

use expecta::prelude::*;
use expecta::Registry;
use serde::Deserialize;

/// A complete test fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Named custom testers (see [`crate::tester`]) installed for every case.
    #[serde(default)]
    pub testers: Vec<String>,
    pub cases: Vec<TestCase>,
}

/// Which check a case performs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// `expect(actual).toEqual(expected)`
    #[default]
    Equals,
    /// `expect(actual).toContain(expected)`
    Contains,
}

/// Test case
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub name: String,
    #[serde(default)]
    pub op: Operation,
    pub expected: serde_json::Value,
    pub actual: serde_json::Value,
    /// Whether the expectation should pass.
    pub pass: bool,
    /// Exact failure message, checked when present.
    #[serde(default)]
    pub message: Option<String>,
}

impl TestCase {
    /// Load both sides and run the expectation.
    ///
    /// # Errors
    ///
    /// Propagates value loading errors.
    pub fn run(
        &self,
        util: &MatchersUtil,
        registry: &Registry,
    ) -> Result<CaseResult, MatcherError> {
        let expected = registry.load_value(&self.expected)?;
        let actual = registry.load_value(&self.actual)?;

        let expectation = expect(util, actual);
        let result = match self.op {
            Operation::Equals => expectation.to_equal(expected)?,
            Operation::Contains => expectation.to_contain(expected)?,
        };

        let message_ok = self
            .message
            .as_ref()
            .map_or(true, |m| result.message.as_ref() == Some(m));
        Ok(CaseResult {
            case_name: self.name.clone(),
            passed: result.passed == self.pass && message_ok,
            expected: self.pass,
            actual: result.passed,
            message: result.message,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of running a single test case
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    /// The case behaved as the fixture says it should.
    pub passed: bool,
    pub expected: bool,
    pub actual: bool,
    pub message: Option<String>,
}

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// A fresh comparison context with this fixture's testers installed.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::InvalidConfig`] for an unknown tester name.
    pub fn util(&self) -> Result<MatchersUtil, MatcherError> {
        let util = MatchersUtil::new();
        for name in &self.testers {
            let tester = crate::tester(name).ok_or_else(|| MatcherError::InvalidConfig {
                reason: format!("unknown tester \"{name}\""),
            })?;
            util.custom_testers().push(tester);
        }
        Ok(util)
    }

    /// Run all test cases and return results
    ///
    /// # Errors
    ///
    /// Returns the first tester lookup or value loading error.
    pub fn run(&self, registry: &Registry) -> Result<Vec<CaseResult>, MatcherError> {
        let util = self.util()?;
        self.cases
            .iter()
            .map(|case| case.run(&util, registry))
            .collect()
    }

    /// Run all test cases and panic on first failure
    pub fn run_and_assert(&self, registry: &Registry) {
        let results = self
            .run(registry)
            .unwrap_or_else(|e| panic!("Fixture '{}' failed to load: {e}", self.name));
        for result in results {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: expected pass={}, got pass={} with message {:?}",
                self.name, result.case_name, result.expected, result.actual, result.message
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        crate::register(expecta::RegistryBuilder::new()).build()
    }

    #[test]
    fn parses_and_runs_a_fixture() {
        let fixture = Fixture::from_yaml(
            r#"
name: smoke
testers: [string_coercion]
cases:
  - name: coerced
    expected: 1
    actual: "1"
    pass: true
  - name: mismatch with message
    expected: { a: 1 }
    actual: { a: 2 }
    pass: false
    message: "Expected $.a = 2 to equal 1."
  - name: contains
    op: contains
    expected: b
    actual: [a, b]
    pass: true
"#,
        )
        .unwrap();

        assert_eq!(fixture.cases[2].op, Operation::Contains);
        let results = fixture.run(&registry()).unwrap();
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.passed), "{results:?}");
    }

    #[test]
    fn wrong_message_fails_the_case() {
        let fixture = Fixture::from_yaml(
            r#"
name: message
cases:
  - name: wrong text
    expected: 1
    actual: 2
    pass: false
    message: "something else"
"#,
        )
        .unwrap();
        let results = fixture.run(&registry()).unwrap();
        assert!(!results[0].passed);
        assert!(!results[0].actual);
    }

    #[test]
    fn unknown_tester_is_an_error() {
        let fixture = Fixture::from_yaml("name: bad\ntesters: [nope]\ncases: []\n").unwrap();
        let err = fixture.run(&registry()).unwrap_err();
        assert!(err.to_string().contains("unknown tester \"nope\""));
    }

    #[test]
    fn multi_document_yaml() {
        let fixtures =
            Fixture::from_yaml_multi("name: one\ncases: []\n---\nname: two\ncases: []\n").unwrap();
        assert_eq!(fixtures.len(), 2);
        assert_eq!(fixtures[1].name, "two");
    }
}
