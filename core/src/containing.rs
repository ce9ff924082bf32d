//! Container matchers: `arrayContaining`, `arrayWithExactContents`,
//! `objectContaining`, `mapContaining`, `setContaining`
//!
//! Each matcher validates the kind of its sample at construction and fails
//! with a usage error immediately. The sample's top level is copied at
//! construction, so later pushes to the original container do not change
//! what the matcher requires. Matching recurses through the context's
//! `equals`, so custom testers and nested asymmetric matchers apply.

use indexmap::IndexMap;

use crate::matchers_util::assign_distinct;
use crate::{
    AsymmetricMatcher, DefaultPrettyPrinter, MatchContext, MatcherError, PrettyPrinter, Value,
};

fn describe(sample: &Value) -> String {
    DefaultPrettyPrinter::new().pp(sample)
}

// ═══════════════════════════════════════════════════════════════════════════════
// arrayContaining
// ═══════════════════════════════════════════════════════════════════════════════

/// Matches an array that contains every sample item, in any order.
///
/// Duplicates in the sample are not counted: `[1, 1]` is satisfied by `[1]`.
#[derive(Debug, Clone)]
pub struct ArrayContaining {
    items: Vec<Value>,
}

impl ArrayContaining {
    /// Build the matcher from an array sample.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::MissingArray`] if `sample` is not an array.
    pub fn new(sample: &Value) -> Result<Self, MatcherError> {
        match sample {
            Value::Array(items) => Ok(Self {
                items: items.snapshot(),
            }),
            _ => Err(MatcherError::MissingArray {
                matcher: "arrayContaining",
                sample: describe(sample),
            }),
        }
    }

    /// Copy of the sample.
    #[must_use]
    pub fn sample(&self) -> Value {
        Value::array(self.items.iter().cloned())
    }
}

impl AsymmetricMatcher for ArrayContaining {
    fn asymmetric_match(&self, actual: &Value, ctx: &MatchContext) -> bool {
        if !matches!(actual, Value::Array(_)) {
            return false;
        }
        self.items.iter().all(|item| ctx.contains(actual, item))
    }

    fn jasmine_to_string(&self, pp: &dyn PrettyPrinter) -> String {
        format!("<jasmine.arrayContaining({})>", pp.pp(&self.sample()))
    }
}

/// `arrayContaining(sample)` as an expected value.
///
/// # Errors
///
/// Returns [`MatcherError::MissingArray`] if `sample` is not an array.
pub fn array_containing(sample: impl Into<Value>) -> Result<Value, MatcherError> {
    ArrayContaining::new(&sample.into()).map(Value::matcher)
}

// ═══════════════════════════════════════════════════════════════════════════════
// arrayWithExactContents
// ═══════════════════════════════════════════════════════════════════════════════

/// Matches an array with exactly the sample's items, in any order.
#[derive(Debug, Clone)]
pub struct ArrayWithExactContents {
    items: Vec<Value>,
}

impl ArrayWithExactContents {
    /// Build the matcher from an array sample.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::MissingArray`] if `sample` is not an array.
    pub fn new(sample: &Value) -> Result<Self, MatcherError> {
        match sample {
            Value::Array(items) => Ok(Self {
                items: items.snapshot(),
            }),
            _ => Err(MatcherError::MissingArray {
                matcher: "arrayWithExactContents",
                sample: describe(sample),
            }),
        }
    }

    /// Copy of the sample.
    #[must_use]
    pub fn sample(&self) -> Value {
        Value::array(self.items.iter().cloned())
    }
}

impl AsymmetricMatcher for ArrayWithExactContents {
    fn asymmetric_match(&self, actual: &Value, ctx: &MatchContext) -> bool {
        let Value::Array(actual) = actual else {
            return false;
        };
        let actual = actual.read();
        if actual.len() != self.items.len() {
            return false;
        }
        let relation: Vec<Vec<bool>> = self
            .items
            .iter()
            .map(|item| actual.iter().map(|a| ctx.equals(item, a)).collect())
            .collect();
        assign_distinct(&relation, actual.len())
    }

    fn jasmine_to_string(&self, pp: &dyn PrettyPrinter) -> String {
        let sample = pp.pp(&self.sample());
        format!("<jasmine.arrayWithExactContents({sample})>")
    }
}

/// `arrayWithExactContents(sample)` as an expected value.
///
/// # Errors
///
/// Returns [`MatcherError::MissingArray`] if `sample` is not an array.
pub fn array_with_exact_contents(sample: impl Into<Value>) -> Result<Value, MatcherError> {
    ArrayWithExactContents::new(&sample.into()).map(Value::matcher)
}

// ═══════════════════════════════════════════════════════════════════════════════
// objectContaining
// ═══════════════════════════════════════════════════════════════════════════════

/// Matches an object that has every sample property with an equal value.
/// Extra properties on the actual object are ignored.
#[derive(Debug, Clone)]
pub struct ObjectContaining {
    properties: IndexMap<String, Value>,
}

impl ObjectContaining {
    /// Build the matcher from an object sample.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::MissingObject`] if `sample` is not an object.
    pub fn new(sample: &Value) -> Result<Self, MatcherError> {
        match sample {
            Value::Object(props) => Ok(Self {
                properties: props.snapshot(),
            }),
            _ => Err(MatcherError::MissingObject {
                sample: describe(sample),
            }),
        }
    }

    /// Copy of the sample.
    #[must_use]
    pub fn sample(&self) -> Value {
        Value::object(self.properties.iter().map(|(k, v)| (k.clone(), v.clone())))
    }
}

impl AsymmetricMatcher for ObjectContaining {
    fn asymmetric_match(&self, actual: &Value, ctx: &MatchContext) -> bool {
        let Value::Object(actual) = actual else {
            return false;
        };
        let actual = actual.read();
        self.properties.iter().all(|(key, expected)| {
            actual
                .get(key)
                .is_some_and(|value| ctx.equals(expected, value))
        })
    }

    fn jasmine_to_string(&self, pp: &dyn PrettyPrinter) -> String {
        format!("<jasmine.objectContaining({})>", pp.pp(&self.sample()))
    }
}

/// `objectContaining(sample)` as an expected value.
///
/// # Errors
///
/// Returns [`MatcherError::MissingObject`] if `sample` is not an object.
pub fn object_containing(sample: impl Into<Value>) -> Result<Value, MatcherError> {
    ObjectContaining::new(&sample.into()).map(Value::matcher)
}

// ═══════════════════════════════════════════════════════════════════════════════
// mapContaining
// ═══════════════════════════════════════════════════════════════════════════════

/// Matches a map in which every sample entry has an entry with a matching key
/// and a matching value. An empty sample matches every map.
#[derive(Debug, Clone)]
pub struct MapContaining {
    entries: Vec<(Value, Value)>,
}

impl MapContaining {
    /// Build the matcher from a map sample.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::MissingMap`] if `sample` is not a map.
    pub fn new(sample: &Value) -> Result<Self, MatcherError> {
        match sample {
            Value::Map(entries) => Ok(Self {
                entries: entries.snapshot(),
            }),
            _ => Err(MatcherError::MissingMap {
                sample: describe(sample),
            }),
        }
    }

    /// Copy of the sample.
    #[must_use]
    pub fn sample(&self) -> Value {
        Value::map(self.entries.iter().cloned())
    }
}

impl AsymmetricMatcher for MapContaining {
    fn asymmetric_match(&self, actual: &Value, ctx: &MatchContext) -> bool {
        let Value::Map(actual) = actual else {
            return false;
        };
        let actual = actual.read();
        self.entries.iter().all(|(key, value)| {
            actual
                .iter()
                .any(|(k, v)| ctx.equals(key, k) && ctx.equals(value, v))
        })
    }

    fn jasmine_to_string(&self, pp: &dyn PrettyPrinter) -> String {
        format!("<jasmine.mapContaining({})>", pp.pp(&self.sample()))
    }
}

/// `mapContaining(sample)` as an expected value.
///
/// # Errors
///
/// Returns [`MatcherError::MissingMap`] if `sample` is not a map.
pub fn map_containing(sample: impl Into<Value>) -> Result<Value, MatcherError> {
    MapContaining::new(&sample.into()).map(Value::matcher)
}

// ═══════════════════════════════════════════════════════════════════════════════
// setContaining
// ═══════════════════════════════════════════════════════════════════════════════

/// Matches a set in which every sample member has an equal member. An empty
/// sample matches every set.
#[derive(Debug, Clone)]
pub struct SetContaining {
    members: Vec<Value>,
}

impl SetContaining {
    /// Build the matcher from a set sample.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::MissingSet`] if `sample` is not a set.
    pub fn new(sample: &Value) -> Result<Self, MatcherError> {
        match sample {
            Value::Set(members) => Ok(Self {
                members: members.snapshot(),
            }),
            _ => Err(MatcherError::MissingSet {
                sample: describe(sample),
            }),
        }
    }

    /// Copy of the sample.
    #[must_use]
    pub fn sample(&self) -> Value {
        Value::set(self.members.iter().cloned())
    }
}

impl AsymmetricMatcher for SetContaining {
    fn asymmetric_match(&self, actual: &Value, ctx: &MatchContext) -> bool {
        let Value::Set(actual) = actual else {
            return false;
        };
        let actual = actual.read();
        self.members
            .iter()
            .all(|member| actual.iter().any(|m| ctx.equals(member, m)))
    }

    fn jasmine_to_string(&self, pp: &dyn PrettyPrinter) -> String {
        format!("<jasmine.setContaining({})>", pp.pp(&self.sample()))
    }
}

/// `setContaining(sample)` as an expected value.
///
/// # Errors
///
/// Returns [`MatcherError::MissingSet`] if `sample` is not a set.
pub fn set_containing(sample: impl Into<Value>) -> Result<Value, MatcherError> {
    SetContaining::new(&sample.into()).map(Value::matcher)
}

// ═══════════════════════════════════════════════════════════════════════════════
// IntoAsymmetricMatcher impls (feature = "registry")
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "registry")]
mod into_asymmetric_matcher {
    use std::sync::Arc;

    use super::{
        ArrayContaining, ArrayWithExactContents, MapContaining, ObjectContaining, SetContaining,
    };
    use crate::config::SampleConfig;
    use crate::registry::{IntoAsymmetricMatcher, Registry};
    use crate::{AsymmetricMatcher, MatcherError};

    macro_rules! sample_matcher {
        ($($ty:ident),+ $(,)?) => {
            $(
                impl IntoAsymmetricMatcher for $ty {
                    type Config = SampleConfig;

                    fn from_config(
                        config: Self::Config,
                        registry: &Registry,
                    ) -> Result<Arc<dyn AsymmetricMatcher>, MatcherError> {
                        let sample = registry.load_value(&config.sample)?;
                        Ok(Arc::new($ty::new(&sample)?))
                    }
                }
            )+
        };
    }

    sample_matcher!(
        ArrayContaining,
        ArrayWithExactContents,
        ObjectContaining,
        MapContaining,
        SetContaining,
    );
}
