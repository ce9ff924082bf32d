//! End-to-end scenarios through `expect(...)` and the comparator.

use expecta::prelude::*;

fn numbers(ns: &[i32]) -> Value {
    Value::array(ns.iter().copied().map(Value::from))
}

// ═══════════════════════════════════════════════════════════════════════════════
// expect(...).to_equal(asymmetric)
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn any_number_passes_for_a_number() {
    let util = MatchersUtil::new();
    let result = expect(&util, 5)
        .to_equal(any(TypeDescriptor::Number))
        .unwrap();
    assert!(result.passed);
    assert_eq!(result.message, None);
}

#[test]
fn any_number_fails_for_a_string_with_attributed_message() {
    let util = MatchersUtil::new();
    let result = expect(&util, "five")
        .to_equal(any(TypeDescriptor::Number))
        .unwrap();
    assert!(!result.passed);
    assert_eq!(result.matcher_name, "toEqual");
    let message = result.message.unwrap();
    assert!(message.starts_with("Expected 'five'"), "{message}");
    assert!(!message.contains("Error"), "{message}");
}

#[test]
fn array_containing_subset() {
    let util = MatchersUtil::new();
    let sample = || array_containing(numbers(&[2, 3])).unwrap();

    let hit = expect(&util, numbers(&[1, 2, 3])).to_equal(sample());
    assert!(hit.unwrap().passed);

    let result = expect(&util, numbers(&[1, 2])).to_equal(sample()).unwrap();
    assert!(!result.passed);
    assert_eq!(
        result.message.as_deref(),
        Some("Expected [ 1, 2 ] to equal <jasmine.arrayContaining([ 2, 3 ])>.")
    );
}

#[test]
fn asymmetric_matchers_nested_in_structures() {
    let util = MatchersUtil::new();
    let expected = Value::object([
        ("id", any(TypeDescriptor::Number)),
        ("name", string_matching("^al").unwrap()),
        ("tags", not_empty()),
        ("meta", anything()),
    ]);
    let actual = Value::object([
        ("id", Value::from(1)),
        ("name", Value::from("alice")),
        ("tags", Value::array([Value::from("admin")])),
        ("meta", Value::object([("k", Value::from(true))])),
    ]);
    assert!(util.equals(&expected, &actual));

    let actual = Value::object([
        ("id", Value::from("1")),
        ("name", Value::from("bob")),
        ("tags", Value::array([])),
        ("meta", Value::Null),
    ]);
    let mut diff = DiffBuilder::new();
    assert!(!util.equals_with_diff(&expected, &actual, &mut diff));
    assert_eq!(diff.len(), 4);
    let first = "Expected $.id = '1' to equal <jasmine.any(Number)>.";
    assert!(diff.records()[0].starts_with(first));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Reflexivity
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn every_kind_equals_itself() {
    let util = MatchersUtil::new();
    let spy = Spy::new("s");
    let values = [
        Value::Undefined,
        Value::Null,
        Value::from(false),
        Value::from(f64::NAN),
        Value::from(-0.0),
        Value::from("x"),
        numbers(&[1, 2]),
        Value::object([("a", Value::from(1))]),
        Value::map([(Value::from("k"), numbers(&[1]))]),
        Value::set([numbers(&[1]), numbers(&[1])]),
        Value::function("f"),
        Value::from(spy),
        anything(),
    ];
    for value in &values {
        assert!(util.equals(value, value), "{value:?}");
    }
}

#[test]
fn self_referential_array_equals_itself() {
    let util = MatchersUtil::new();
    let cyclic = Value::array([Value::from(1)]);
    if let Value::Array(items) = &cyclic {
        items.push(cyclic.clone());
    }
    assert!(util.equals(&cyclic, &cyclic));
    assert_eq!(util.pp(&cyclic), "[ 1, <circular reference: Array> ]");
}

#[test]
fn structurally_identical_cycles_are_equal() {
    let util = MatchersUtil::new();
    let cycle = || {
        let node = Value::object([("name", Value::from("node"))]);
        if let Value::Object(props) = &node {
            props.insert("next", node.clone());
        }
        node
    };
    assert!(util.equals(&cycle(), &cycle()));
}

#[test]
fn differently_shaped_cycles_are_not_equal() {
    let util = MatchersUtil::new();
    let a = Value::object([("name", Value::from("a"))]);
    if let Value::Object(props) = &a {
        props.insert("next", a.clone());
    }
    let b = Value::object([("name", Value::from("b"))]);
    if let Value::Object(props) = &b {
        props.insert("next", b.clone());
    }
    assert!(!util.equals(&a, &b));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Custom testers
// ═══════════════════════════════════════════════════════════════════════════════

fn case_insensitive(expected: &Value, actual: &Value, _: &MatchersUtil) -> Option<bool> {
    match (expected.as_str(), actual.as_str()) {
        (Some(e), Some(a)) => Some(e.eq_ignore_ascii_case(a)),
        _ => None,
    }
}

#[test]
fn custom_tester_reaches_into_containing_matchers() {
    let util = MatchersUtil::new();
    let expected = object_containing(Value::object([("name", Value::from("ALICE"))])).unwrap();
    let actual = Value::object([("name", Value::from("alice")), ("id", Value::from(1))]);

    assert!(!util.equals(&expected, &actual));
    util.add_custom_tester(case_insensitive);
    assert!(util.equals(&expected, &actual));
}

#[test]
fn custom_tester_applies_to_to_equal_and_to_contain() {
    let util = MatchersUtil::new();
    util.add_custom_tester(case_insensitive);

    assert!(expect(&util, "Hello").to_equal("HELLO").unwrap().passed);
    let list = Value::array([Value::from("One"), Value::from("Two")]);
    assert!(expect(&util, list).to_contain("two").unwrap().passed);
}

#[test]
fn first_deciding_tester_wins() {
    let util = MatchersUtil::new();
    util.add_custom_tester(|_: &Value, _: &Value, _: &MatchersUtil| None);
    util.add_custom_tester(|_: &Value, _: &Value, _: &MatchersUtil| Some(false));
    util.add_custom_tester(|_: &Value, _: &Value, _: &MatchersUtil| Some(true));
    assert!(!util.equals(&Value::from(1), &Value::from(1)));
}
