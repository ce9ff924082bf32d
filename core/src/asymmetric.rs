//! Asymmetric matchers — expected-side specifications
//!
//! An asymmetric matcher placed on the expected side of a comparison decides
//! the match for its node by itself: structural comparison never runs there.
//! Matchers are immutable after construction and receive the comparison
//! context ([`MatchContext`]) so container matchers can recurse.
//!
//! This module holds the trait and the type/truthiness family. Container
//! matchers live in `containing`, pattern matching in `string_matching`.

use std::fmt::{self, Debug};

use crate::{MatchContext, PrettyPrinter, Value};

/// An expected-side matcher.
///
/// `Send + Sync + Debug` so matchers can be shared across threads and show up
/// in traces.
///
/// # Example
///
/// ```
/// use expecta::{AsymmetricMatcher, MatchContext, MatchersUtil, PrettyPrinter, Value};
///
/// #[derive(Debug)]
/// struct Even;
///
/// impl AsymmetricMatcher for Even {
///     fn asymmetric_match(&self, actual: &Value, _ctx: &MatchContext) -> bool {
///         actual.as_number().is_some_and(|n| n % 2.0 == 0.0)
///     }
///
///     fn jasmine_to_string(&self, _pp: &dyn PrettyPrinter) -> String {
///         "<even>".to_owned()
///     }
/// }
///
/// let util = MatchersUtil::new();
/// assert!(util.equals(&Value::matcher(Even), &Value::from(4)));
/// assert!(!util.equals(&Value::matcher(Even), &Value::from(3)));
/// ```
pub trait AsymmetricMatcher: Send + Sync + Debug {
    /// Returns `true` if `actual` satisfies this matcher.
    fn asymmetric_match(&self, actual: &Value, ctx: &MatchContext) -> bool;

    /// Display form used in messages, e.g. `<jasmine.any(Number)>`.
    fn jasmine_to_string(&self, pp: &dyn PrettyPrinter) -> String;
}

// ═══════════════════════════════════════════════════════════════════════════════
// Any
// ═══════════════════════════════════════════════════════════════════════════════

/// The runtime types `any()` can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeDescriptor {
    /// Numbers (including `NaN`).
    Number,
    /// Strings.
    String,
    /// Booleans.
    Boolean,
    /// Functions and spies.
    Function,
    /// Any non-null container: array, object, map or set.
    Object,
    /// Arrays.
    Array,
    /// Maps.
    Map,
    /// Sets.
    Set,
}

impl TypeDescriptor {
    /// Returns `true` if `value` is of this type.
    #[must_use]
    pub fn describes(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::Number, Value::Number(_))
                | (Self::String, Value::String(_))
                | (Self::Boolean, Value::Bool(_))
                | (Self::Function, Value::Function(_) | Value::Spy(_))
                | (
                    Self::Object,
                    Value::Array(_) | Value::Object(_) | Value::Map(_) | Value::Set(_)
                )
                | (Self::Array, Value::Array(_))
                | (Self::Map, Value::Map(_))
                | (Self::Set, Value::Set(_))
        )
    }

    /// Type name as shown in `<jasmine.any(...)>`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Number => "Number",
            Self::String => "String",
            Self::Boolean => "Boolean",
            Self::Function => "Function",
            Self::Object => "Object",
            Self::Array => "Array",
            Self::Map => "Map",
            Self::Set => "Set",
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Matches any value of a given runtime type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Any {
    expected: TypeDescriptor,
}

impl Any {
    /// A matcher for values of type `expected`.
    #[must_use]
    pub fn new(expected: TypeDescriptor) -> Self {
        Self { expected }
    }

    /// The required type.
    #[must_use]
    pub fn expected(&self) -> TypeDescriptor {
        self.expected
    }
}

impl AsymmetricMatcher for Any {
    fn asymmetric_match(&self, actual: &Value, _ctx: &MatchContext) -> bool {
        self.expected.describes(actual)
    }

    fn jasmine_to_string(&self, _pp: &dyn PrettyPrinter) -> String {
        format!("<jasmine.any({})>", self.expected)
    }
}

/// `any(type)` as an expected value.
#[must_use]
pub fn any(expected: TypeDescriptor) -> Value {
    Value::matcher(Any::new(expected))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Presence and truthiness
// ═══════════════════════════════════════════════════════════════════════════════

/// Matches anything except `undefined` and `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Anything;

impl AsymmetricMatcher for Anything {
    fn asymmetric_match(&self, actual: &Value, _ctx: &MatchContext) -> bool {
        !actual.is_nullish()
    }

    fn jasmine_to_string(&self, _pp: &dyn PrettyPrinter) -> String {
        "<jasmine.anything>".to_owned()
    }
}

/// `anything()` as an expected value.
#[must_use]
pub fn anything() -> Value {
    Value::matcher(Anything)
}

/// Matches truthy values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Truthy;

impl AsymmetricMatcher for Truthy {
    fn asymmetric_match(&self, actual: &Value, _ctx: &MatchContext) -> bool {
        actual.is_truthy()
    }

    fn jasmine_to_string(&self, _pp: &dyn PrettyPrinter) -> String {
        "<jasmine.truthy>".to_owned()
    }
}

/// `truthy()` as an expected value.
#[must_use]
pub fn truthy() -> Value {
    Value::matcher(Truthy)
}

/// Matches falsy values: `false`, `0`, `-0`, `NaN`, `""`, `null`, `undefined`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Falsy;

impl AsymmetricMatcher for Falsy {
    fn asymmetric_match(&self, actual: &Value, _ctx: &MatchContext) -> bool {
        !actual.is_truthy()
    }

    fn jasmine_to_string(&self, _pp: &dyn PrettyPrinter) -> String {
        "<jasmine.falsy>".to_owned()
    }
}

/// `falsy()` as an expected value.
#[must_use]
pub fn falsy() -> Value {
    Value::matcher(Falsy)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Emptiness
// ═══════════════════════════════════════════════════════════════════════════════

/// Matches a string, array, object, map or set with no members.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Empty;

impl AsymmetricMatcher for Empty {
    fn asymmetric_match(&self, actual: &Value, _ctx: &MatchContext) -> bool {
        actual.size() == Some(0)
    }

    fn jasmine_to_string(&self, _pp: &dyn PrettyPrinter) -> String {
        "<jasmine.empty>".to_owned()
    }
}

/// `empty()` as an expected value.
#[must_use]
pub fn empty() -> Value {
    Value::matcher(Empty)
}

/// Matches a string, array, object, map or set with at least one member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotEmpty;

impl AsymmetricMatcher for NotEmpty {
    fn asymmetric_match(&self, actual: &Value, _ctx: &MatchContext) -> bool {
        actual.size().is_some_and(|n| n > 0)
    }

    fn jasmine_to_string(&self, _pp: &dyn PrettyPrinter) -> String {
        "<jasmine.notEmpty>".to_owned()
    }
}

/// `not_empty()` as an expected value.
#[must_use]
pub fn not_empty() -> Value {
    Value::matcher(NotEmpty)
}

// ═══════════════════════════════════════════════════════════════════════════════
// IntoAsymmetricMatcher impls (feature = "registry")
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "registry")]
mod into_asymmetric_matcher {
    use std::sync::Arc;

    use super::{Any, Anything, AsymmetricMatcher, Empty, Falsy, NotEmpty, Truthy};
    use crate::config::{AnyConfig, UnitConfig};
    use crate::registry::{IntoAsymmetricMatcher, Registry};
    use crate::MatcherError;

    impl IntoAsymmetricMatcher for Any {
        type Config = AnyConfig;

        fn from_config(
            config: Self::Config,
            _registry: &Registry,
        ) -> Result<Arc<dyn AsymmetricMatcher>, MatcherError> {
            Ok(Arc::new(Any::new(config.type_)))
        }
    }

    macro_rules! unit_matcher {
        ($($ty:ident),+ $(,)?) => {
            $(
                impl IntoAsymmetricMatcher for $ty {
                    type Config = UnitConfig;

                    fn from_config(
                        _config: Self::Config,
                        _registry: &Registry,
                    ) -> Result<Arc<dyn AsymmetricMatcher>, MatcherError> {
                        Ok(Arc::new($ty))
                    }
                }
            )+
        };
    }

    unit_matcher!(Anything, Truthy, Falsy, Empty, NotEmpty);
}
