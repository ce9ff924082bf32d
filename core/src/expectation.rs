//! `expect(actual).to_x(...)` — matcher-attributed expectation results
//!
//! An [`Expectation`] binds an actual value to a comparison context and runs
//! matchers against it, optionally negated. Each run yields an
//! [`ExpectationResult`] naming the matcher, so reporters can attribute a
//! failure to the matcher that produced it.

use tracing::trace;

use crate::{
    Matcher, MatcherError, MatchersUtil, ToContain, ToEqual, ToHaveBeenCalled,
    ToHaveBeenCalledTimes, ToHaveBeenCalledWith, Value,
};

/// Start an expectation on `actual`.
pub fn expect(util: &MatchersUtil, actual: impl Into<Value>) -> Expectation {
    Expectation {
        util: util.clone(),
        actual: actual.into(),
        negated: false,
    }
}

/// The outcome of one expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectationResult {
    /// Name of the matcher that ran, e.g. `"toEqual"`.
    pub matcher_name: String,
    /// Whether the expectation held (after negation).
    pub passed: bool,
    /// Failure message. `None` when the expectation passed.
    pub message: Option<String>,
    /// Whether the expectation was negated with [`Expectation::not`].
    pub negated: bool,
}

/// An actual value waiting for a matcher.
#[derive(Debug, Clone)]
pub struct Expectation {
    util: MatchersUtil,
    actual: Value,
    negated: bool,
}

impl Expectation {
    /// Negate the expectation.
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    /// The actual value.
    #[must_use]
    pub fn actual(&self) -> &Value {
        &self.actual
    }

    /// Run `matcher` with `expected` arguments.
    ///
    /// # Errors
    ///
    /// Propagates the matcher's usage errors.
    pub fn to(
        &self,
        matcher: &dyn Matcher,
        expected: &[Value],
    ) -> Result<ExpectationResult, MatcherError> {
        let result = matcher.compare(&self.util, &self.actual, expected)?;
        let passed = result.pass != self.negated;
        trace!(
            matcher = matcher.name(),
            passed,
            negated = self.negated,
            "expectation evaluated"
        );

        let message = if passed {
            None
        } else {
            Some(
                result
                    .message()
                    .unwrap_or_else(|| self.default_message(matcher.name(), expected)),
            )
        };

        Ok(ExpectationResult {
            matcher_name: matcher.name().to_owned(),
            passed,
            message,
            negated: self.negated,
        })
    }

    /// Deep equality.
    ///
    /// # Errors
    ///
    /// Never fails for `toEqual`; the `Result` mirrors [`to`](Self::to).
    pub fn to_equal(&self, expected: impl Into<Value>) -> Result<ExpectationResult, MatcherError> {
        self.to(&ToEqual, &[expected.into()])
    }

    /// Containment in an array, set or string.
    ///
    /// # Errors
    ///
    /// Never fails for `toContain`; the `Result` mirrors [`to`](Self::to).
    pub fn to_contain(
        &self,
        expected: impl Into<Value>,
    ) -> Result<ExpectationResult, MatcherError> {
        self.to(&ToContain, &[expected.into()])
    }

    /// The spy was called.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::NotASpy`] if the actual value is not a spy.
    pub fn to_have_been_called(&self) -> Result<ExpectationResult, MatcherError> {
        self.to(&ToHaveBeenCalled, &[])
    }

    /// The spy was called exactly `times` times.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::NotASpy`] if the actual value is not a spy.
    pub fn to_have_been_called_times(
        &self,
        times: usize,
    ) -> Result<ExpectationResult, MatcherError> {
        self.to(&ToHaveBeenCalledTimes, &[Value::from(times)])
    }

    /// The spy was called with these arguments at least once.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::NotASpy`] if the actual value is not a spy.
    pub fn to_have_been_called_with(
        &self,
        args: impl IntoIterator<Item = Value>,
    ) -> Result<ExpectationResult, MatcherError> {
        let args: Vec<Value> = args.into_iter().collect();
        self.to(&ToHaveBeenCalledWith, &args)
    }

    fn default_message(&self, matcher_name: &str, expected: &[Value]) -> String {
        let mut message = format!("Expected {}", self.util.pp(&self.actual));
        if self.negated {
            message.push_str(" not");
        }
        message.push(' ');
        message.push_str(&englishy(matcher_name));
        if !expected.is_empty() {
            let printed: Vec<String> = expected.iter().map(|e| self.util.pp(e)).collect();
            message.push(' ');
            message.push_str(&printed.join(", "));
        }
        message.push('.');
        message
    }
}

/// `toHaveBeenCalled` becomes `to have been called`.
fn englishy(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push(' ');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
