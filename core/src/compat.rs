//! `MatchContext` — the context handed to every asymmetric matcher
//!
//! Older asymmetric matchers were written against the custom tester list,
//! newer ones against the comparison context. `MatchContext` serves both: it
//! derefs to [`MatchersUtil`] for `equals`/`contains`/`pp`, and exposes the
//! read surface of a sequence over the tester list (plus an append-only
//! `push`). It owns no state of its own: every call reads through to the
//! wrapped context and list.

use std::fmt;
use std::ops::{Bound, Deref, RangeBounds};
use std::sync::Arc;

use crate::{CustomEqualityTester, CustomTesters, MatchersUtil};

type Tester = Arc<dyn CustomEqualityTester>;

/// Comparison context plus tester sequence.
///
/// # Example
///
/// ```
/// use expecta::{MatchersUtil, Value};
///
/// let util = MatchersUtil::new();
/// util.add_custom_tester(|_: &Value, _: &Value, _: &MatchersUtil| None);
///
/// let ctx = util.context();
/// assert_eq!(ctx.len(), 1);
/// assert!(ctx.equals(&Value::from(1), &Value::from(1)));
/// ```
#[derive(Clone)]
pub struct MatchContext {
    util: MatchersUtil,
    testers: CustomTesters,
}

impl MatchContext {
    /// Wrap a comparison context and a tester list.
    #[must_use]
    pub fn new(util: MatchersUtil, testers: CustomTesters) -> Self {
        Self { util, testers }
    }

    /// The wrapped comparison context.
    #[must_use]
    pub fn util(&self) -> &MatchersUtil {
        &self.util
    }

    /// The wrapped tester list.
    #[must_use]
    pub fn testers(&self) -> &CustomTesters {
        &self.testers
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Sequence surface
    // ═══════════════════════════════════════════════════════════════════════

    /// Number of testers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.testers.len()
    }

    /// Returns `true` if there are no testers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.testers.is_empty()
    }

    /// The tester at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Tester> {
        self.testers.get(index)
    }

    /// The first tester.
    #[must_use]
    pub fn first(&self) -> Option<Tester> {
        self.testers.get(0)
    }

    /// The last tester.
    #[must_use]
    pub fn last(&self) -> Option<Tester> {
        self.testers.snapshot().pop()
    }

    /// Iterate over the testers present right now.
    pub fn iter(&self) -> std::vec::IntoIter<Tester> {
        self.testers.snapshot().into_iter()
    }

    /// Call `f` with each tester and its index.
    pub fn for_each(&self, mut f: impl FnMut(&Tester, usize)) {
        for (index, tester) in self.iter().enumerate() {
            f(&tester, index);
        }
    }

    /// Map every tester.
    pub fn map<R>(&self, mut f: impl FnMut(&Tester, usize) -> R) -> Vec<R> {
        self.iter()
            .enumerate()
            .map(|(index, tester)| f(&tester, index))
            .collect()
    }

    /// The testers for which `predicate` holds.
    pub fn filter(&self, mut predicate: impl FnMut(&Tester, usize) -> bool) -> Vec<Tester> {
        self.iter()
            .enumerate()
            .filter(|(index, tester)| predicate(tester, *index))
            .map(|(_, tester)| tester)
            .collect()
    }

    /// Left fold (`reduce`).
    pub fn fold<B>(&self, init: B, f: impl FnMut(B, &Tester) -> B) -> B {
        let mut f = f;
        self.iter().fold(init, |acc, tester| f(acc, &tester))
    }

    /// Right fold (`reduceRight`).
    pub fn rfold<B>(&self, init: B, f: impl FnMut(B, &Tester) -> B) -> B {
        let mut f = f;
        self.iter().rfold(init, |acc, tester| f(acc, &tester))
    }

    /// Returns `true` if `predicate` holds for some tester (`some`).
    pub fn any(&self, mut predicate: impl FnMut(&Tester) -> bool) -> bool {
        self.iter().any(|tester| predicate(&tester))
    }

    /// Returns `true` if `predicate` holds for every tester (`every`).
    pub fn all(&self, mut predicate: impl FnMut(&Tester) -> bool) -> bool {
        self.iter().all(|tester| predicate(&tester))
    }

    /// The first tester for which `predicate` holds.
    pub fn find(&self, mut predicate: impl FnMut(&Tester) -> bool) -> Option<Tester> {
        self.iter().find(|tester| predicate(tester))
    }

    /// Index of the first occurrence of `tester`, by identity (`indexOf`).
    #[must_use]
    pub fn position(&self, tester: &Tester) -> Option<usize> {
        self.iter().position(|t| same_tester(&t, tester))
    }

    /// Index of the last occurrence of `tester`, by identity (`lastIndexOf`).
    #[must_use]
    pub fn rposition(&self, tester: &Tester) -> Option<usize> {
        self.testers
            .snapshot()
            .iter()
            .rposition(|t| same_tester(t, tester))
    }

    /// Copy of a sub-range; out-of-range bounds are clamped.
    #[must_use]
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Vec<Tester> {
        let all = self.testers.snapshot();
        let len = all.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        }
        .min(len);
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        }
        .min(len);
        if start >= end {
            return Vec::new();
        }
        all[start..end].to_vec()
    }

    /// The testers followed by `others`.
    pub fn concat(&self, others: impl IntoIterator<Item = Tester>) -> Vec<Tester> {
        let mut all = self.testers.snapshot();
        all.extend(others);
        all
    }

    /// Copy of the tester list.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Tester> {
        self.testers.snapshot()
    }

    /// Append a tester to the wrapped list. Returns the new length.
    pub fn push(&self, tester: Tester) -> usize {
        self.testers.push(tester);
        self.testers.len()
    }
}

fn same_tester(a: &Tester, b: &Tester) -> bool {
    std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
}

impl Deref for MatchContext {
    type Target = MatchersUtil;

    fn deref(&self) -> &MatchersUtil {
        &self.util
    }
}

impl<'a> IntoIterator for &'a MatchContext {
    type Item = Tester;
    type IntoIter = std::vec::IntoIter<Tester>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for MatchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchContext")
            .field("testers", &self.testers.len())
            .finish_non_exhaustive()
    }
}
