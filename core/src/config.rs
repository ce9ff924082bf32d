//! Config types for config-driven expected values and matchers.
//!
//! Expected values can be written as JSON/YAML documents and loaded with
//! [`Registry::load_value()`](crate::Registry::load_value). Plain JSON maps to
//! the obvious kinds (`null`, booleans, numbers, strings, arrays, objects).
//! Kinds JSON cannot express use reserved single-key objects:
//!
//! | Form | Value |
//! |------|-------|
//! | `{"$undefined": null}` | `Value::Undefined` |
//! | `{"$number": "NaN"}` | `NaN` (also `"Infinity"`, `"-Infinity"`, `"-0"`) |
//! | `{"$map": [[k, v], ...]}` | `Value::Map` |
//! | `{"$set": [a, b, ...]}` | `Value::Set` |
//! | `{"$function": "name"}` | a fresh `Value::Function` |
//! | `{"$matcher": {"type_url": ..., "config": ...}}` | an asymmetric matcher ([`TypedConfig`]) |
//!
//! # Matcher configs
//!
//! | Config type | Matchers |
//! |-------------|----------|
//! | [`UnitConfig`] | `Anything`, `Truthy`, `Falsy`, `Empty`, `NotEmpty` |
//! | [`AnyConfig`] | `Any` |
//! | [`StringMatchingConfig`] | `StringMatching` |
//! | [`SampleConfig`] | `ArrayContaining`, `ArrayWithExactContents`, `ObjectContaining`, `MapContaining`, `SetContaining` |

use serde::Deserialize;

use crate::TypeDescriptor;

/// Reference to a registered matcher type with its configuration.
///
/// ```json
/// { "type_url": "expecta.v1.StringMatching", "config": { "pattern": "^foo" } }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct TypedConfig {
    /// The type URL identifying the registered matcher type.
    /// Must match a `type_url` registered in the [`Registry`](crate::Registry).
    pub type_url: String,

    /// Type-specific configuration payload.
    /// Deserialized as the `Config` associated type of the registered
    /// [`IntoAsymmetricMatcher`](crate::IntoAsymmetricMatcher).
    #[serde(default = "default_config")]
    pub config: serde_json::Value,
}

fn default_config() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Empty configuration for matchers that take no parameters.
///
/// Accepts any JSON value (`{}`, `null`, etc.) and ignores it.
#[derive(Debug, Clone, Copy)]
pub struct UnitConfig;

impl<'de> Deserialize<'de> for UnitConfig {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde::de::IgnoredAny::deserialize(deserializer)?;
        Ok(UnitConfig)
    }
}

/// Configuration for `Any`.
///
/// ```json
/// { "type": "Number" }
/// ```
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AnyConfig {
    /// The required runtime type.
    #[serde(rename = "type")]
    pub type_: TypeDescriptor,
}

/// Configuration for `StringMatching`.
///
/// ```json
/// { "pattern": "^foo\\d" }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct StringMatchingConfig {
    /// Regex source; unanchored unless it anchors itself.
    pub pattern: String,
}

/// Configuration for the container matchers.
///
/// The sample is itself a value document and may contain nested
/// `$matcher` forms.
///
/// ```json
/// { "sample": { "$map": [["foo", { "$matcher": { "type_url": "expecta.v1.Anything" } }]] } }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SampleConfig {
    /// The sample, as a value document.
    pub sample: serde_json::Value,
}
