//! Call-record matchers: `toHaveBeenCalledWith`, `toHaveBeenCalledTimes`
//!
//! Both inspect a [`Spy`](crate::Spy)'s invocation history. Anything that is
//! not a spy is a usage error, reported with the matcher name and a usage line.

use tracing::debug;

use crate::value::format_number;
use crate::{DiffBuilder, Matcher, MatcherError, MatcherResult, MatchersUtil, Value};

// ═══════════════════════════════════════════════════════════════════════════════
// toHaveBeenCalledWith
// ═══════════════════════════════════════════════════════════════════════════════

/// The spy was called at least once with arguments equal to the expected ones.
///
/// Argument lists are compared with the full comparator, so asymmetric
/// matchers and custom testers apply to individual arguments.
///
/// # Example
///
/// ```
/// use expecta::{anything, Matcher, MatchersUtil, Spy, ToHaveBeenCalledWith, Value};
///
/// let util = MatchersUtil::new();
/// let spy = Spy::new("save");
/// spy.call([Value::from("draft"), Value::from(3)]);
///
/// let result = ToHaveBeenCalledWith
///     .compare(&util, &spy.into(), &[Value::from("draft"), anything()])
///     .unwrap();
/// assert!(result.pass);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ToHaveBeenCalledWith;

impl ToHaveBeenCalledWith {
    const USAGE: &'static str = "expect(<spyObj>).toHaveBeenCalledWith(...arguments)";
}

impl Matcher for ToHaveBeenCalledWith {
    fn name(&self) -> &'static str {
        "toHaveBeenCalledWith"
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

        let identity = spy.identity().to_owned();
        let expected_args = Value::array(expected.iter().cloned());
        let calls = spy.calls();

        if !calls.any() {
            debug!(spy = %identity, "spy was never called");
            let util = util.clone();
            return Ok(MatcherResult::new(false).with_message(move || {
                format!(
                    "Expected spy {identity} to have been called with:\n  {}\nbut it was never called.",
                    util.pp(&expected_args)
                )
            }));
        }

        let all_args: Vec<Value> = calls.all_args().into_iter().map(Value::array).collect();
        let pass = util.contains(&Value::array(all_args.iter().cloned()), &expected_args);
        debug!(spy = %identity, calls = all_args.len(), pass, "compared call arguments");

        let util = util.clone();
        if pass {
            return Ok(MatcherResult::new(true).with_message(move || {
                format!(
                    "Expected spy {identity} not to have been called with:\n  {}\nbut it was.",
                    util.pp(&expected_args)
                )
            }));
        }

        Ok(MatcherResult::new(false).with_message(move || {
            let printed_calls: Vec<String> = all_args
                .iter()
                .map(|args| format!("  {}", util.pp(args)))
                .collect();
            let diffs: Vec<String> = all_args
                .iter()
                .enumerate()
                .map(|(index, args)| {
                    let mut diff = DiffBuilder::new();
                    util.equals_with_diff(&expected_args, args, &mut diff);
                    format!("Call {index}:\n{}", diff.indented("  "))
                })
                .collect();
            let expected = util.pp(&expected_args);
            let calls = printed_calls.join(",\n");
            let diffs = diffs.join("\n");
            format!(
                "Expected spy {identity} to have been called with:\n  {expected}\nbut actual calls were:\n{calls}.\n\n{diffs}"
            )
        }))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// toHaveBeenCalledTimes
// ═══════════════════════════════════════════════════════════════════════════════

/// The spy was called exactly `n` times.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToHaveBeenCalledTimes;

impl ToHaveBeenCalledTimes {
    const USAGE: &'static str = "expect(<spyObj>).toHaveBeenCalledTimes(<Number>)";
}

impl Matcher for ToHaveBeenCalledTimes {
    fn name(&self) -> &'static str {
        "toHaveBeenCalledTimes"
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
        let Some(times) = expected.first().and_then(Value::as_number) else {
            return Err(MatcherError::ExpectedTimesRequired);
        };

        let count = spy.calls().count();
        #[allow(clippy::cast_precision_loss)]
        let pass = count as f64 == times;
        debug!(spy = %spy.identity(), count, times, pass, "compared call count");

        let identity = spy.identity().to_owned();
        Ok(MatcherResult::new(pass).with_message(move || {
            let expected_times = if times == 1.0 {
                "once".to_owned()
            } else {
                format!("{} times", format_number(times))
            };
            let not = if pass { "not " } else { "" };
            format!(
                "Expected spy {identity} {not}to have been called {expected_times}. It was called {count} times."
            )
        }))
    }
}
