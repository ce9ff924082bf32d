//! `MatchContext` as seen by user-written asymmetric matchers.

use std::sync::Arc;

use expecta::prelude::*;
use expecta::CustomTesters;

/// Matches when the context carries exactly `testers` custom testers and the
/// actual value equals `inner` under that context.
#[derive(Debug)]
struct WithTesterCount {
    testers: usize,
    inner: Value,
}

impl AsymmetricMatcher for WithTesterCount {
    fn asymmetric_match(&self, actual: &Value, ctx: &MatchContext) -> bool {
        ctx.len() == self.testers && ctx.equals(&self.inner, actual)
    }

    fn jasmine_to_string(&self, pp: &dyn PrettyPrinter) -> String {
        let (testers, inner) = (self.testers, pp.pp(&self.inner));
        format!("<withTesterCount({testers}, {inner})>")
    }
}

fn always(result: bool) -> Arc<dyn CustomEqualityTester> {
    Arc::new(move |_: &Value, _: &Value, _: &MatchersUtil| Some(result))
}

fn answer(tester: &Arc<dyn CustomEqualityTester>) -> Option<bool> {
    tester.test(&Value::Null, &Value::Null, &MatchersUtil::new())
}

#[test]
fn user_matcher_sees_the_live_tester_list() {
    let util = MatchersUtil::new();
    let expected = Value::matcher(WithTesterCount {
        testers: 1,
        inner: Value::from(1),
    });

    assert!(!util.equals(&expected, &Value::from(1)));
    util.add_custom_tester(|_: &Value, _: &Value, _: &MatchersUtil| None);
    assert!(util.equals(&expected, &Value::from(1)));
    assert_eq!(util.pp(&expected), "<withTesterCount(1, 1)>");
}

#[test]
fn elements_are_the_same_testers_not_copies() {
    let testers = CustomTesters::new();
    let tester = always(true);
    testers.push(tester.clone());
    let util = MatchersUtil::with_custom_testers(testers.clone());
    let ctx = util.context();

    assert_eq!(ctx.position(&tester), Some(0));
    assert_eq!(ctx.find(|_| true).and_then(|t| ctx.position(&t)), Some(0));
    assert!(ctx.testers().ptr_eq(&testers));
    assert!(ctx.util().custom_testers().ptr_eq(&testers));
}

#[test]
fn later_additions_are_visible_through_an_existing_context() {
    let util = MatchersUtil::new();
    let ctx = util.context();
    assert!(ctx.is_empty());

    util.add_custom_tester(|_: &Value, _: &Value, _: &MatchersUtil| Some(false));
    assert_eq!(ctx.len(), 1);
    assert!(!ctx.equals(&Value::from(1), &Value::from(1)));
}

#[test]
fn push_writes_through_to_the_context() {
    let util = MatchersUtil::new();
    let ctx = util.context();
    let tester = always(true);

    assert_eq!(ctx.push(tester.clone()), 1);
    assert_eq!(util.custom_testers().len(), 1);
    assert!(util.equals(&Value::from(1), &Value::from("anything")));
    assert_eq!(ctx.rposition(&tester), Some(0));
}

#[test]
fn sequence_operations() {
    let first = always(true);
    let second = always(false);
    let testers: CustomTesters = [first.clone(), second.clone(), first.clone()]
        .into_iter()
        .collect();
    let ctx = MatchersUtil::with_custom_testers(testers.clone()).context();

    assert_eq!(ctx.len(), 3);
    assert_eq!(ctx.position(&first), Some(0));
    assert_eq!(ctx.rposition(&first), Some(2));
    assert_eq!(ctx.position(&second), Some(1));
    assert_eq!(ctx.slice(1..).len(), 2);
    assert_eq!(ctx.slice(5..9).len(), 0);
    assert_eq!(ctx.concat([second.clone()]).len(), 4);
    assert_eq!(ctx.map(|_, index| index), vec![0, 1, 2]);
    assert_eq!(ctx.fold(0, |n, _| n + 1), 3);
    assert!(ctx.any(|t| answer(t) == Some(false)));
    assert!(!ctx.all(|t| answer(t) == Some(true)));
    assert_eq!(ctx.filter(|_, index| index != 1).len(), 2);
    assert_eq!((&ctx).into_iter().count(), 3);
}
