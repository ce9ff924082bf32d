//! Custom equality testers
//!
//! A tester is consulted at every node of a comparison before structural
//! equality. It answers `Some(true)` (equal), `Some(false)` (not equal) or
//! `None` (no opinion, ask the next tester). The first definite answer wins.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::{MatchersUtil, Value};

/// A user-supplied equality rule.
///
/// Any `Fn(&Value, &Value, &MatchersUtil) -> Option<bool>` closure is a tester.
/// The [`MatchersUtil`] argument lets a tester recurse into the full
/// comparison (for example, to compare one field of a record).
///
/// # Example
///
/// ```
/// use expecta::{MatchersUtil, Value};
///
/// let util = MatchersUtil::new();
/// util.add_custom_tester(|expected: &Value, actual: &Value, _: &MatchersUtil| {
///     match (expected.as_str(), actual.as_str()) {
///         (Some(e), Some(a)) => Some(e.eq_ignore_ascii_case(a)),
///         _ => None,
///     }
/// });
///
/// assert!(util.equals(&Value::from("Hello"), &Value::from("HELLO")));
/// ```
pub trait CustomEqualityTester: Send + Sync {
    /// Decide equality of `expected` and `actual`, or defer with `None`.
    fn test(&self, expected: &Value, actual: &Value, util: &MatchersUtil) -> Option<bool>;
}

impl<F> CustomEqualityTester for F
where
    F: Fn(&Value, &Value, &MatchersUtil) -> Option<bool> + Send + Sync,
{
    fn test(&self, expected: &Value, actual: &Value, util: &MatchersUtil) -> Option<bool> {
        self(expected, actual, util)
    }
}

/// The ordered, append-only tester list shared by a comparison context and
/// everything cloned from it.
///
/// Testers can be appended but never removed. Each top-level comparison works
/// from a [`snapshot`](Self::snapshot), so a tester appended mid-comparison
/// takes effect from the next comparison on.
#[derive(Clone, Default)]
pub struct CustomTesters {
    inner: Arc<RwLock<Vec<Arc<dyn CustomEqualityTester>>>>,
}

impl CustomTesters {
    /// An empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tester. Visible to every handle sharing this list.
    pub fn push(&self, tester: Arc<dyn CustomEqualityTester>) {
        self.inner.write().push(tester);
    }

    /// Number of registered testers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns `true` if no tester is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// The tester at `index` (the same `Arc` the list holds).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Arc<dyn CustomEqualityTester>> {
        self.inner.read().get(index).cloned()
    }

    /// Copy of the current list, in registration order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<dyn CustomEqualityTester>> {
        self.inner.read().clone()
    }

    /// Returns `true` if both handles share the same list.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl FromIterator<Arc<dyn CustomEqualityTester>> for CustomTesters {
    fn from_iter<I: IntoIterator<Item = Arc<dyn CustomEqualityTester>>>(iter: I) -> Self {
        Self {
            inner: Arc::new(RwLock::new(iter.into_iter().collect())),
        }
    }
}

impl fmt::Debug for CustomTesters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomTesters")
            .field("len", &self.len())
            .finish()
    }
}
