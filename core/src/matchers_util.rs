//! `MatchersUtil` — the comparison context
//!
//! Holds the custom tester chain and the pretty printer, and implements the
//! recursive comparator (`equals`) and the containment check (`contains`).
//!
//! # Comparison order at each node
//!
//! 1. Expected is an asymmetric matcher: the matcher decides.
//! 2. Custom testers, in registration order: the first `Some(_)` decides.
//! 3. Same reference (container, function, spy, matcher): equal.
//! 4. Structural comparison by kind.
//!
//! Cycles are handled with a stack of `(expected, actual)` container identity
//! pairs: a pair that is already being compared further up is treated as equal.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::value::numbers_equal;
use crate::{
    ArrayRef, CustomEqualityTester, CustomTesters, DefaultPrettyPrinter, DiffBuilder, MapRef,
    MatchContext, ObjectRef, PrettyPrinter, SetRef, Value,
};

/// The comparison context threaded through every match.
///
/// Cheap to clone: clones share the tester list and the printer, so a tester
/// added through one clone is seen by all of them.
///
/// # Example
///
/// ```
/// use expecta::{MatchersUtil, Value};
///
/// let util = MatchersUtil::new();
/// let a = Value::object([("items", Value::array([Value::from(1), Value::from(2)]))]);
/// let b = Value::object([("items", Value::array([Value::from(1), Value::from(2)]))]);
///
/// assert!(util.equals(&a, &b));
/// assert!(util.contains(&Value::array([a.clone()]), &b));
/// ```
#[derive(Clone)]
pub struct MatchersUtil {
    testers: CustomTesters,
    printer: Arc<dyn PrettyPrinter>,
}

impl Default for MatchersUtil {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchersUtil {
    /// A context with no custom testers and the default printer.
    #[must_use]
    pub fn new() -> Self {
        Self::with_custom_testers(CustomTesters::new())
    }

    /// A context sharing an existing tester list.
    #[must_use]
    pub fn with_custom_testers(testers: CustomTesters) -> Self {
        Self {
            testers,
            printer: Arc::new(DefaultPrettyPrinter::new()),
        }
    }

    /// Replace the pretty printer.
    #[must_use]
    pub fn pretty_printer(mut self, printer: impl PrettyPrinter + 'static) -> Self {
        self.printer = Arc::new(printer);
        self
    }

    /// Append a custom tester. Seen by every clone of this context.
    pub fn add_custom_tester(&self, tester: impl CustomEqualityTester + 'static) {
        self.testers.push(Arc::new(tester));
    }

    /// The shared tester list.
    #[must_use]
    pub fn custom_testers(&self) -> &CustomTesters {
        &self.testers
    }

    /// The injected pretty printer.
    #[must_use]
    pub fn printer(&self) -> &dyn PrettyPrinter {
        self.printer.as_ref()
    }

    /// Pretty-print a value with the injected printer.
    #[must_use]
    pub fn pp(&self, value: &Value) -> String {
        self.printer.pp(value)
    }

    /// The compatibility context handed to asymmetric matchers.
    #[must_use]
    pub fn context(&self) -> MatchContext {
        MatchContext::new(self.clone(), self.testers.clone())
    }

    /// Deep equality of `expected` and `actual`.
    #[must_use]
    pub fn equals(&self, expected: &Value, actual: &Value) -> bool {
        self.equals_with_diff(expected, actual, &mut DiffBuilder::disabled())
    }

    /// Deep equality, recording every mismatch in `diff`.
    pub fn equals_with_diff(
        &self,
        expected: &Value,
        actual: &Value,
        diff: &mut DiffBuilder,
    ) -> bool {
        let mut comparison = Comparison {
            util: self,
            testers: self.testers.snapshot(),
            stack: Vec::new(),
        };
        comparison.eq(expected, actual, diff)
    }

    /// Containment: some element of an array or set equals `needle`, or a
    /// string `needle` is a substring of a string `haystack`.
    #[must_use]
    pub fn contains(&self, haystack: &Value, needle: &Value) -> bool {
        match haystack {
            Value::Array(items) | Value::Set(items) => {
                items.read().iter().any(|item| self.equals(needle, item))
            }
            Value::String(text) => needle.as_str().is_some_and(|n| text.contains(n)),
            _ => false,
        }
    }

    /// [`contains`](Self::contains), recording why nothing matched. For an
    /// array or set every element's mismatches are recorded under its index;
    /// any other haystack gets a single record.
    pub fn contains_with_diff(
        &self,
        haystack: &Value,
        needle: &Value,
        diff: &mut DiffBuilder,
    ) -> bool {
        if self.contains(haystack, needle) {
            return true;
        }
        if let Value::Array(items) | Value::Set(items) = haystack {
            for (index, item) in items.read().iter().enumerate() {
                diff.with_path(index, |d| self.equals_with_diff(needle, item, d));
            }
        } else {
            diff.record_with(|_| {
                let (haystack, needle) = (self.pp(haystack), self.pp(needle));
                format!("Expected {haystack} to contain {needle}.")
            });
        }
        false
    }
}

impl fmt::Debug for MatchersUtil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchersUtil")
            .field("testers", &self.testers)
            .finish_non_exhaustive()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Comparator
// ═══════════════════════════════════════════════════════════════════════════════

/// State of one top-level comparison.
struct Comparison<'a> {
    util: &'a MatchersUtil,
    /// Snapshot of the tester list taken when the comparison started.
    testers: Vec<Arc<dyn CustomEqualityTester>>,
    /// `(expected, actual)` container identities currently being compared.
    stack: Vec<(usize, usize)>,
}

impl Comparison<'_> {
    fn eq(&mut self, expected: &Value, actual: &Value, diff: &mut DiffBuilder) -> bool {
        if let Value::Matcher(matcher) = expected {
            let matched = matcher.asymmetric_match(actual, &self.util.context());
            trace!(?matcher, matched, "asymmetric matcher decided");
            if !matched {
                diff.record_mismatch(expected, actual, self.util.printer());
            }
            return matched;
        }

        for (index, tester) in self.testers.iter().enumerate() {
            if let Some(equal) = tester.test(expected, actual, self.util) {
                trace!(tester = index, equal, "custom tester decided");
                if !equal {
                    diff.record_mismatch(expected, actual, self.util.printer());
                }
                return equal;
            }
        }

        if expected.same_identity(actual) {
            return true;
        }

        let equal = match (expected, actual) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(e), Value::Bool(a)) => e == a,
            (Value::Number(e), Value::Number(a)) => numbers_equal(*e, *a),
            (Value::String(e), Value::String(a)) => e == a,
            (Value::Array(e), Value::Array(a)) => {
                return self.guarded(e.id(), a.id(), |this| this.arrays(e, a, diff));
            }
            (Value::Object(e), Value::Object(a)) => {
                return self.guarded(e.id(), a.id(), |this| this.objects(e, a, diff));
            }
            (Value::Map(e), Value::Map(a)) => {
                let equal = self.guarded(e.id(), a.id(), |this| this.maps(e, a));
                if !equal {
                    diff.record_mismatch(expected, actual, self.util.printer());
                }
                return equal;
            }
            (Value::Set(e), Value::Set(a)) => {
                let equal = self.guarded(e.id(), a.id(), |this| this.sets(e, a));
                if !equal {
                    diff.record_mismatch(expected, actual, self.util.printer());
                }
                return equal;
            }
            // Functions, spies and matchers are equal only by identity.
            _ => false,
        };

        if !equal {
            diff.record_mismatch(expected, actual, self.util.printer());
        }
        equal
    }

    fn guarded(
        &mut self,
        expected: usize,
        actual: usize,
        compare: impl FnOnce(&mut Self) -> bool,
    ) -> bool {
        if self.stack.contains(&(expected, actual)) {
            trace!(expected, actual, "cycle defused");
            return true;
        }
        self.stack.push((expected, actual));
        let equal = compare(self);
        self.stack.pop();
        equal
    }

    fn arrays(&mut self, expected: &ArrayRef, actual: &ArrayRef, diff: &mut DiffBuilder) -> bool {
        let expected = expected.read();
        let actual = actual.read();
        let util = self.util;
        let printer = util.printer();

        let mut equal = true;
        if expected.len() != actual.len() {
            diff.with_path("length", |d| {
                d.record_mismatch(
                    &Value::from(expected.len()),
                    &Value::from(actual.len()),
                    printer,
                );
            });
            if !diff.is_enabled() {
                return false;
            }
            equal = false;
        }

        for index in 0..expected.len().max(actual.len()) {
            let element_equal = diff.with_path(index, |d| {
                match (expected.get(index), actual.get(index)) {
                    (Some(e), Some(a)) => self.eq(e, a, d),
                    (Some(e), None) => {
                        self.eq(e, &Value::Undefined, d);
                        false
                    }
                    (None, Some(a)) => {
                        d.record_with(|path| {
                            format!("Unexpected {path} = {} in array.", printer.pp(a))
                        });
                        false
                    }
                    (None, None) => true,
                }
            });
            if !element_equal {
                if !diff.is_enabled() {
                    return false;
                }
                equal = false;
            }
        }
        equal
    }

    fn objects(
        &mut self,
        expected: &ObjectRef,
        actual: &ObjectRef,
        diff: &mut DiffBuilder,
    ) -> bool {
        let expected = expected.read();
        let actual = actual.read();
        let util = self.util;
        let printer = util.printer();

        let missing: Vec<_> = expected
            .iter()
            .filter(|(key, _)| !actual.contains_key(*key))
            .collect();
        let extra: Vec<_> = actual
            .iter()
            .filter(|(key, _)| !expected.contains_key(*key))
            .collect();

        let mut equal = true;
        if !missing.is_empty() || !extra.is_empty() {
            if !diff.is_enabled() {
                return false;
            }
            diff.record_with(|path| {
                let at = if path.depth() > 0 {
                    path.to_string()
                } else {
                    "object".to_owned()
                };
                let properties = |props: &[(&String, &Value)]| {
                    props
                        .iter()
                        .map(|(key, value)| format!("    {key}: {}", printer.pp(value)))
                        .collect::<Vec<_>>()
                        .join("\n")
                };
                let mut lines = Vec::new();
                if !missing.is_empty() {
                    lines.push(format!(
                        "Expected {at} to have properties\n{}",
                        properties(&missing)
                    ));
                }
                if !extra.is_empty() {
                    lines.push(format!(
                        "Expected {at} not to have properties\n{}",
                        properties(&extra)
                    ));
                }
                lines.join("\n")
            });
            equal = false;
        }

        for (key, e) in expected.iter() {
            let Some(a) = actual.get(key) else {
                continue;
            };
            if !diff.with_path(key.as_str(), |d| self.eq(e, a, d)) {
                if !diff.is_enabled() {
                    return false;
                }
                equal = false;
            }
        }
        equal
    }

    fn maps(&mut self, expected: &MapRef, actual: &MapRef) -> bool {
        let expected = expected.read();
        let actual = actual.read();
        if expected.len() != actual.len() {
            return false;
        }
        self.claim_all(&expected, &actual, |this, (ek, ev), (ak, av)| {
            let mut quiet = DiffBuilder::disabled();
            this.eq(ek, ak, &mut quiet) && this.eq(ev, av, &mut quiet)
        })
    }

    fn sets(&mut self, expected: &SetRef, actual: &SetRef) -> bool {
        let expected = expected.read();
        let actual = actual.read();
        if expected.len() != actual.len() {
            return false;
        }
        self.claim_all(&expected, &actual, |this, e, a| {
            this.eq(e, a, &mut DiffBuilder::disabled())
        })
    }

    /// Find a matching in which every expected item claims a distinct actual
    /// item (augmenting paths over the "matches" relation).
    fn claim_all<T>(
        &mut self,
        expected: &[T],
        actual: &[T],
        mut matches: impl FnMut(&mut Self, &T, &T) -> bool,
    ) -> bool {
        let mut relation = Vec::with_capacity(expected.len());
        for e in expected {
            let mut row = Vec::with_capacity(actual.len());
            for a in actual {
                row.push(matches(self, e, a));
            }
            relation.push(row);
        }
        assign_distinct(&relation, actual.len())
    }
}

/// Returns `true` if every row of `relation` can be assigned a distinct column
/// it relates to.
pub(crate) fn assign_distinct(relation: &[Vec<bool>], columns: usize) -> bool {
    fn augment(
        row: usize,
        relation: &[Vec<bool>],
        owner: &mut [Option<usize>],
        visited: &mut [bool],
    ) -> bool {
        for column in 0..owner.len() {
            if !relation[row][column] || visited[column] {
                continue;
            }
            visited[column] = true;
            let free = match owner[column] {
                None => true,
                Some(other) => augment(other, relation, owner, visited),
            };
            if free {
                owner[column] = Some(row);
                return true;
            }
        }
        false
    }

    if relation.len() > columns {
        return false;
    }
    let mut owner = vec![None; columns];
    for row in 0..relation.len() {
        let mut visited = vec![false; columns];
        if !augment(row, relation, &mut owner, &mut visited) {
            return false;
        }
    }
    true
}
