//! Matcher contract and the basic matchers
//!
//! A [`Matcher`] compares an actual value against expected arguments and
//! produces a [`MatcherResult`]. Misuse (a non-spy passed to a spy matcher,
//! a missing count) is a [`MatcherError`]; a mismatch is `pass: false`.
//!
//! Failure messages are lazy: the closure only runs when a reporter asks for
//! the text, so passing assertions never pay for pretty printing or diffing.

use std::fmt;

use crate::{DiffBuilder, MatcherError, MatchersUtil, Value};

/// A deferred message.
pub type LazyMessage = Box<dyn Fn() -> String + Send + Sync>;

/// Outcome of a [`Matcher::compare`] call.
pub struct MatcherResult {
    /// Whether the actual value satisfied the matcher.
    pub pass: bool,
    message: Option<LazyMessage>,
}

impl MatcherResult {
    /// A result with no matcher-provided message.
    #[must_use]
    pub fn new(pass: bool) -> Self {
        Self {
            pass,
            message: None,
        }
    }

    /// Attach a lazily computed message.
    #[must_use]
    pub fn with_message(mut self, message: impl Fn() -> String + Send + Sync + 'static) -> Self {
        self.message = Some(Box::new(message));
        self
    }

    /// Returns `true` if the matcher provided a message.
    #[must_use]
    pub fn has_message(&self) -> bool {
        self.message.is_some()
    }

    /// Evaluate the message, if any.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        self.message.as_ref().map(|message| message())
    }
}

impl fmt::Debug for MatcherResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatcherResult")
            .field("pass", &self.pass)
            .field("has_message", &self.message.is_some())
            .finish()
    }
}

/// A named comparison of an actual value against expected arguments.
pub trait Matcher: Send + Sync {
    /// Name used in messages and results, e.g. `"toEqual"`.
    fn name(&self) -> &'static str;

    /// Compare `actual` against `expected`.
    ///
    /// # Errors
    ///
    /// Returns a [`MatcherError`] when the matcher is misused. A value that
    /// simply does not match is `Ok` with `pass: false`.
    fn compare(
        &self,
        util: &MatchersUtil,
        actual: &Value,
        expected: &[Value],
    ) -> Result<MatcherResult, MatcherError>;
}

fn first_or_undefined(expected: &[Value]) -> Value {
    expected.first().cloned().unwrap_or(Value::Undefined)
}

// ═══════════════════════════════════════════════════════════════════════════════
// toEqual
// ═══════════════════════════════════════════════════════════════════════════════

/// Deep equality. The failure message lists every mismatch with its path.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToEqual;

impl Matcher for ToEqual {
    fn name(&self) -> &'static str {
        "toEqual"
    }

    fn compare(
        &self,
        util: &MatchersUtil,
        actual: &Value,
        expected: &[Value],
    ) -> Result<MatcherResult, MatcherError> {
        let expected = first_or_undefined(expected);
        if util.equals(&expected, actual) {
            return Ok(MatcherResult::new(true));
        }

        let util = util.clone();
        let actual = actual.clone();
        Ok(MatcherResult::new(false).with_message(move || {
            let mut diff = DiffBuilder::new();
            util.equals_with_diff(&expected, &actual, &mut diff);
            diff.message()
        }))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// toContain
// ═══════════════════════════════════════════════════════════════════════════════

/// Containment in an array, set or string.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToContain;

impl Matcher for ToContain {
    fn name(&self) -> &'static str {
        "toContain"
    }

    fn compare(
        &self,
        util: &MatchersUtil,
        actual: &Value,
        expected: &[Value],
    ) -> Result<MatcherResult, MatcherError> {
        let needle = first_or_undefined(expected);
        Ok(MatcherResult::new(util.contains(actual, &needle)))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// toHaveBeenCalled
// ═══════════════════════════════════════════════════════════════════════════════

/// The spy was called at least once.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToHaveBeenCalled;

impl ToHaveBeenCalled {
    const USAGE: &'static str = "expect(<spyObj>).toHaveBeenCalled()";
}

impl Matcher for ToHaveBeenCalled {
    fn name(&self) -> &'static str {
        "toHaveBeenCalled"
    }

    fn compare(
        &self,
        util: &MatchersUtil,
        actual: &Value,
        expected: &[Value],
    ) -> Result<MatcherResult, MatcherError> {
        let Some(spy) = actual.as_spy() else {
            return Err(MatcherError::NotASpy {
                matcher: self.name(),
                usage: Self::USAGE,
                actual: util.pp(actual),
            });
        };
        if !expected.is_empty() {
            return Err(MatcherError::UnexpectedArguments {
                matcher: self.name(),
                usage: Self::USAGE,
            });
        }

        let pass = spy.calls().any();
        let identity = spy.identity().to_owned();
        Ok(MatcherResult::new(pass).with_message(move || {
            if pass {
                format!("Expected spy {identity} not to have been called.")
            } else {
                format!("Expected spy {identity} to have been called.")
            }
        }))
    }
}
