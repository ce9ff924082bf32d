//! Type registry for config-driven matcher construction.
//!
//! The registry turns value documents (JSON/YAML) into [`Value`]s, resolving
//! `{"$matcher": {"type_url": ..., "config": ...}}` nodes into asymmetric
//! matchers through registered factories.
//!
//! # Architecture (axum `BoxedIntoRoute` pattern)
//!
//! Each matcher type registers itself via [`IntoAsymmetricMatcher`]. At
//! registration time, the concrete type `T` is monomorphized into a closure and
//! erased behind `Box<dyn Fn>`: early type erasure at registration, late
//! invocation at load time.
//!
//! # Example
//!
//! ```
//! use expecta::{register_core_matchers, MatchersUtil, RegistryBuilder, Value};
//!
//! let registry = register_core_matchers(RegistryBuilder::new()).build();
//!
//! let expected = registry.load_value(&serde_json::json!({
//!     "id": { "$matcher": { "type_url": "expecta.v1.Any", "config": { "type": "Number" } } },
//!     "tags": { "$set": ["a", "b"] }
//! })).unwrap();
//!
//! let actual = Value::object([
//!     ("id", Value::from(7)),
//!     ("tags", Value::set([Value::from("b"), Value::from("a")])),
//! ]);
//! assert!(MatchersUtil::new().equals(&expected, &actual));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::TypedConfig;
use crate::{AsymmetricMatcher, MatcherError, Value, MAX_DEPTH};

// ═══════════════════════════════════════════════════════════════════════════════
// Trait
// ═══════════════════════════════════════════════════════════════════════════════

/// Trait for asymmetric matcher types that can be constructed from configuration.
///
/// Each matcher type knows its own config shape via the associated `Config`
/// type. The registry is passed along so container matchers can load their
/// samples (which may contain nested `$matcher` nodes).
///
/// # Example
///
/// ```ignore
/// impl IntoAsymmetricMatcher for StringMatching {
///     type Config = StringMatchingConfig;
///     fn from_config(config: Self::Config, _: &Registry) -> Result<Arc<dyn AsymmetricMatcher>, MatcherError> {
///         Ok(Arc::new(StringMatching::new(&config.pattern)?))
///     }
/// }
/// ```
pub trait IntoAsymmetricMatcher: Send + Sync + 'static {
    /// The configuration type deserialized from JSON/YAML.
    type Config: DeserializeOwned + Send + Sync;

    /// Construct the matcher from deserialized configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::InvalidConfig`] if the config is semantically
    /// invalid, [`MatcherError::InvalidPattern`] for a bad regex, or a sample
    /// kind error for container matchers.
    fn from_config(
        config: Self::Config,
        registry: &Registry,
    ) -> Result<Arc<dyn AsymmetricMatcher>, MatcherError>;
}

/// Type-erased matcher factory closure.
type BoxedMatcherFactory = Box<
    dyn Fn(&serde_json::Value, &Registry) -> Result<Arc<dyn AsymmetricMatcher>, MatcherError>
        + Send
        + Sync,
>;

// ═══════════════════════════════════════════════════════════════════════════════
// Builder
// ═══════════════════════════════════════════════════════════════════════════════

/// Builder for constructing a [`Registry`].
///
/// Register matcher types with their type URLs, then call
/// [`build()`](Self::build) to produce an immutable `Registry`. No runtime
/// registration is possible after that.
pub struct RegistryBuilder {
    matcher_factories: HashMap<String, BoxedMatcherFactory>,
}

impl RegistryBuilder {
    /// Create a new empty registry builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            matcher_factories: HashMap::new(),
        }
    }

    /// Register a matcher type with a type URL.
    ///
    /// At load time, the registry deserializes the config as `T::Config` and
    /// calls `T::from_config()`.
    #[must_use]
    pub fn matcher<T: IntoAsymmetricMatcher>(mut self, type_url: &str) -> Self {
        self.matcher_factories.insert(
            type_url.to_owned(),
            Box::new(|value: &serde_json::Value, registry: &Registry| {
                let config: T::Config = serde_json::from_value(value.clone()).map_err(|e| {
                    MatcherError::InvalidConfig {
                        reason: e.to_string(),
                    }
                })?;
                T::from_config(config, registry)
            }),
        );
        self
    }

    /// Freeze the registry.
    #[must_use]
    pub fn build(self) -> Registry {
        Registry {
            matcher_factories: self.matcher_factories,
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Register every built-in asymmetric matcher under `expecta.v1.<Name>`.
///
/// Extension crates call this first and add their own matchers on top.
///
/// ```ignore
/// pub fn register(builder: RegistryBuilder) -> RegistryBuilder {
///     expecta::register_core_matchers(builder)
///         .matcher::<DivisibleBy>("expecta.test.v1.DivisibleBy")
/// }
/// ```
#[must_use]
pub fn register_core_matchers(builder: RegistryBuilder) -> RegistryBuilder {
    use crate::{
        Any, Anything, ArrayContaining, ArrayWithExactContents, Empty, Falsy, MapContaining,
        NotEmpty, ObjectContaining, SetContaining, StringMatching, Truthy,
    };
    builder
        .matcher::<Any>("expecta.v1.Any")
        .matcher::<Anything>("expecta.v1.Anything")
        .matcher::<Truthy>("expecta.v1.Truthy")
        .matcher::<Falsy>("expecta.v1.Falsy")
        .matcher::<Empty>("expecta.v1.Empty")
        .matcher::<NotEmpty>("expecta.v1.NotEmpty")
        .matcher::<StringMatching>("expecta.v1.StringMatching")
        .matcher::<ArrayContaining>("expecta.v1.ArrayContaining")
        .matcher::<ArrayWithExactContents>("expecta.v1.ArrayWithExactContents")
        .matcher::<ObjectContaining>("expecta.v1.ObjectContaining")
        .matcher::<MapContaining>("expecta.v1.MapContaining")
        .matcher::<SetContaining>("expecta.v1.SetContaining")
}

// ═══════════════════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════════════════

/// Immutable registry of matcher factories.
///
/// Constructed via [`RegistryBuilder`].
pub struct Registry {
    matcher_factories: HashMap<String, BoxedMatcherFactory>,
}

impl Registry {
    /// Returns the number of registered matcher types.
    #[must_use]
    pub fn matcher_count(&self) -> usize {
        self.matcher_factories.len()
    }

    /// Returns `true` if no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matcher_factories.is_empty()
    }

    /// Returns `true` if the given matcher type URL is registered.
    #[must_use]
    pub fn contains_matcher(&self, type_url: &str) -> bool {
        self.matcher_factories.contains_key(type_url)
    }

    /// Returns all registered matcher type URLs (sorted).
    #[must_use]
    pub fn matcher_type_urls(&self) -> Vec<&str> {
        let mut urls: Vec<&str> = self.matcher_factories.keys().map(String::as_str).collect();
        urls.sort_unstable();
        urls
    }

    /// Construct the matcher a [`TypedConfig`] refers to.
    ///
    /// # Errors
    ///
    /// - [`MatcherError::UnknownTypeUrl`] — `type_url` not registered
    /// - [`MatcherError::InvalidConfig`] — config deserialization failed
    /// - whatever the matcher's own constructor rejects
    pub fn load_matcher(
        &self,
        config: &TypedConfig,
    ) -> Result<Arc<dyn AsymmetricMatcher>, MatcherError> {
        let factory = self
            .matcher_factories
            .get(&config.type_url)
            .ok_or_else(|| MatcherError::UnknownTypeUrl {
                type_url: config.type_url.clone(),
                available: self
                    .matcher_type_urls()
                    .into_iter()
                    .map(str::to_owned)
                    .collect(),
            })?;
        let matcher = factory(&config.config, self)?;
        debug!(type_url = %config.type_url, ?matcher, "loaded matcher");
        Ok(matcher)
    }

    /// Load a value document.
    ///
    /// Each `$matcher` sample starts its own document, so nesting is bounded
    /// per document by [`MAX_DEPTH`] and overall by the parser's recursion
    /// limit.
    ///
    /// # Errors
    ///
    /// - [`MatcherError::DepthExceeded`] — nesting deeper than [`MAX_DEPTH`]
    /// - [`MatcherError::InvalidConfig`] — a malformed reserved form
    /// - any [`load_matcher`](Self::load_matcher) error for `$matcher` nodes
    pub fn load_value(&self, document: &serde_json::Value) -> Result<Value, MatcherError> {
        self.load_value_at(document, 0)
    }

    fn load_value_at(
        &self,
        document: &serde_json::Value,
        depth: usize,
    ) -> Result<Value, MatcherError> {
        use serde_json::Value as Json;

        if depth > MAX_DEPTH {
            return Err(MatcherError::DepthExceeded {
                depth,
                max: MAX_DEPTH,
            });
        }

        match document {
            Json::Null => Ok(Value::Null),
            Json::Bool(b) => Ok(Value::Bool(*b)),
            Json::Number(n) => n
                .as_f64()
                .map(Value::Number)
                .ok_or_else(|| invalid(format!("unrepresentable number {n}"))),
            Json::String(s) => Ok(Value::String(s.clone())),
            Json::Array(items) => Ok(Value::array(self.load_all(items, depth)?)),
            Json::Object(map) => {
                if map.len() == 1 {
                    if let Some((key, inner)) = map.iter().next() {
                        if key.starts_with('$') {
                            return self.load_reserved(key, inner, depth);
                        }
                    }
                }
                let entries = map
                    .iter()
                    .map(|(key, value)| Ok((key.clone(), self.load_value_at(value, depth + 1)?)))
                    .collect::<Result<Vec<_>, MatcherError>>()?;
                Ok(Value::object(entries))
            }
        }
    }

    fn load_all(
        &self,
        items: &[serde_json::Value],
        depth: usize,
    ) -> Result<Vec<Value>, MatcherError> {
        items
            .iter()
            .map(|item| self.load_value_at(item, depth + 1))
            .collect()
    }

    fn load_reserved(
        &self,
        key: &str,
        inner: &serde_json::Value,
        depth: usize,
    ) -> Result<Value, MatcherError> {
        use serde_json::Value as Json;

        match key {
            "$undefined" => Ok(Value::Undefined),
            "$number" => match inner.as_str() {
                Some("NaN") => Ok(Value::Number(f64::NAN)),
                Some("Infinity") => Ok(Value::Number(f64::INFINITY)),
                Some("-Infinity") => Ok(Value::Number(f64::NEG_INFINITY)),
                Some("-0") => Ok(Value::Number(-0.0)),
                _ => Err(invalid(format!(
                    "$number must be \"NaN\", \"Infinity\", \"-Infinity\" or \"-0\", got {inner}"
                ))),
            },
            "$map" => {
                let Json::Array(entries) = inner else {
                    return Err(invalid(format!(
                        "$map must be an array of [key, value] pairs, got {inner}"
                    )));
                };
                let mut pairs = Vec::with_capacity(entries.len());
                for entry in entries {
                    match entry.as_array().map(Vec::as_slice) {
                        Some([k, v]) => pairs.push((
                            self.load_value_at(k, depth + 1)?,
                            self.load_value_at(v, depth + 1)?,
                        )),
                        _ => {
                            return Err(invalid(format!(
                                "$map entry must be a [key, value] pair, got {entry}"
                            )))
                        }
                    }
                }
                Ok(Value::map(pairs))
            }
            "$set" => {
                let Json::Array(members) = inner else {
                    return Err(invalid(format!("$set must be an array, got {inner}")));
                };
                Ok(Value::set(self.load_all(members, depth)?))
            }
            "$function" => match inner.as_str() {
                Some(name) => Ok(Value::function(name)),
                None => Err(invalid(format!("$function must be a name, got {inner}"))),
            },
            "$matcher" => {
                let config: TypedConfig = serde_json::from_value(inner.clone())
                    .map_err(|e| invalid(e.to_string()))?;
                Ok(Value::Matcher(self.load_matcher(&config)?))
            }
            // Not reserved: a one-property object whose key happens to start with `$`.
            _ => {
                let value = self.load_value_at(inner, depth + 1)?;
                Ok(Value::object([(key.to_owned(), value)]))
            }
        }
    }
}

fn invalid(reason: String) -> MatcherError {
    MatcherError::InvalidConfig { reason }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("matchers", &self.matcher_type_urls())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DefaultPrettyPrinter, Kind, MatchersUtil, PrettyPrinter};
    use serde_json::json;

    fn registry() -> Registry {
        register_core_matchers(RegistryBuilder::new()).build()
    }

    fn pp(value: &Value) -> String {
        DefaultPrettyPrinter::new().pp(value)
    }

    #[test]
    fn core_matchers_are_registered() {
        let registry = registry();
        assert_eq!(registry.matcher_count(), 12);
        assert!(registry.contains_matcher("expecta.v1.MapContaining"));
        assert!(!registry.contains_matcher("expecta.v1.Nope"));
        let urls = registry.matcher_type_urls();
        assert!(urls.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn plain_json_values() {
        let value = registry()
            .load_value(&json!({ "a": [1, "two", null, true] }))
            .unwrap();
        assert_eq!(pp(&value), "Object({ a: [ 1, 'two', null, true ] })");
    }

    #[test]
    fn reserved_forms() {
        let registry = registry();
        let load = |doc: serde_json::Value| registry.load_value(&doc).unwrap();

        assert!(load(json!({ "$undefined": null })).is_undefined());
        let nan = load(json!({ "$number": "NaN" }));
        assert!(nan.as_number().is_some_and(f64::is_nan));
        assert_eq!(pp(&load(json!({ "$number": "-0" }))), "-0");
        let map = load(json!({ "$map": [["a", 1], [{ "$set": [1, 1] }, 2]] }));
        assert_eq!(pp(&map), "Map( [ 'a', 1 ], [ Set( 1 ), 2 ] )");
        assert_eq!(load(json!({ "$function": "cb" })).kind(), Kind::Function);
        let anything = load(json!({ "$matcher": { "type_url": "expecta.v1.Anything" } }));
        assert_eq!(pp(&anything), "<jasmine.anything>");
        assert_eq!(pp(&load(json!({ "$other": 1 }))), "Object({ $other: 1 })");
    }

    #[test]
    fn nested_matchers_in_samples() {
        let pattern = json!({
            "$matcher": {
                "type_url": "expecta.v1.StringMatching",
                "config": { "pattern": "^foo\\d" }
            }
        });
        let expected = registry()
            .load_value(&json!({
                "$matcher": {
                    "type_url": "expecta.v1.MapContaining",
                    "config": { "sample": { "$map": [[pattern, "bar"]] } }
                }
            }))
            .unwrap();
        let util = MatchersUtil::new();
        let hit = Value::map([(Value::from("foo2"), Value::from("bar"))]);
        let miss = Value::map([(Value::from("foo"), Value::from("bar"))]);
        assert!(util.equals(&expected, &hit));
        assert!(!util.equals(&expected, &miss));
    }

    #[test]
    fn unknown_type_url_lists_registered() {
        let registry = RegistryBuilder::new()
            .matcher::<crate::Anything>("expecta.v1.Anything")
            .build();
        let err = registry
            .load_value(&json!({ "$matcher": { "type_url": "expecta.v1.Nope" } }))
            .unwrap_err();
        assert_eq!(
            err,
            MatcherError::UnknownTypeUrl {
                type_url: "expecta.v1.Nope".into(),
                available: vec!["expecta.v1.Anything".into()],
            }
        );
        let message = err.to_string();
        assert!(message.contains("registered: expecta.v1.Anything"));
    }

    #[test]
    fn bad_matcher_config() {
        let err = registry()
            .load_value(&json!({ "$matcher": { "type_url": "expecta.v1.Any", "config": {} } }))
            .unwrap_err();
        assert!(matches!(err, MatcherError::InvalidConfig { .. }));

        let err = registry()
            .load_value(&json!({ "$matcher": {
                "type_url": "expecta.v1.MapContaining",
                "config": { "sample": { "foo": "bar" } }
            } }))
            .unwrap_err();
        assert!(matches!(err, MatcherError::MissingMap { .. }));
    }

    #[test]
    fn malformed_reserved_forms() {
        let registry = registry();
        for doc in [
            json!({ "$number": "eleven" }),
            json!({ "$map": [["only key"]] }),
            json!({ "$set": 1 }),
            json!({ "$function": 1 }),
        ] {
            let err = registry.load_value(&doc).unwrap_err();
            assert!(matches!(err, MatcherError::InvalidConfig { .. }), "{doc}");
        }
    }

    #[test]
    fn depth_is_bounded() {
        let mut doc = json!(1);
        for _ in 0..=MAX_DEPTH {
            doc = json!([doc]);
        }
        let err = registry().load_value(&doc).unwrap_err();
        assert!(matches!(err, MatcherError::DepthExceeded { .. }));
    }
}
