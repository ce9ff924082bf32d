//! expecta - deep equality and asymmetric matching for behavior tests
//!
//! A matching engine that decides whether an observed value satisfies an
//! expected value, where "expected" may be a literal, a partial structure, a
//! pattern, or a type.
//!
//! # Architecture
//!
//! - [`Value`] — Dynamic data model (primitives, shared containers, spies, matchers)
//! - [`CustomEqualityTester`] — User overrides consulted before structural equality
//! - [`MatchersUtil`] — The comparison context: `equals`, `contains`, `pp`
//! - [`AsymmetricMatcher`] — Expected-side specifications (`any`, `mapContaining`, ...)
//! - [`MatchContext`] — Compatibility shim handed to every asymmetric matcher
//! - [`DiffBuilder`] — Path-annotated mismatch records
//! - [`Matcher`] — `compare(actual, expected)` contract (`toEqual`, `toHaveBeenCalledWith`, ...)
//! - [`Expectation`] — `expect(actual).to_x(...)` producing matcher-attributed results
//!
//! # Key Design Insights
//!
//! 1. **Expected side dictates**: when the expected value is an asymmetric matcher,
//!    its `asymmetric_match` decides; structural comparison never runs for that node.
//!
//! 2. **Explicit context, no globals**: custom testers and the pretty printer live in a
//!    [`MatchersUtil`] that is threaded through every comparison.
//!
//! 3. **Usage errors vs mismatches**: misuse (wrong sample kind, non-spy actual) is a
//!    [`MatcherError`]; a failing comparison is a `pass: false` result with a lazy message.
//!
//! # Example
//!
//! ```
//! use expecta::prelude::*;
//!
//! let util = MatchersUtil::new();
//!
//! let result = expect(&util, 5).to_equal(any(TypeDescriptor::Number)).unwrap();
//! assert!(result.passed);
//!
//! let result = expect(&util, "five").to_equal(any(TypeDescriptor::Number)).unwrap();
//! assert!(!result.passed);
//! assert_eq!(result.matcher_name, "toEqual");
//! assert_eq!(
//!     result.message.as_deref(),
//!     Some("Expected 'five' to equal <jasmine.any(Number)>.")
//! );
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod asymmetric;
mod call_matchers;
mod compat;
mod containing;
mod custom_tester;
mod diff_builder;
mod expectation;
mod matchers;
mod matchers_util;
mod pretty_print;
mod spy;
mod string_matching;
mod value;

#[cfg(feature = "registry")]
mod config;
#[cfg(feature = "registry")]
mod registry;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Core types
pub use compat::MatchContext;
pub use custom_tester::{CustomEqualityTester, CustomTesters};
pub use diff_builder::{indent, DiffBuilder, ObjectPath, PathSegment};
pub use matchers_util::MatchersUtil;
pub use pretty_print::{DefaultPrettyPrinter, PrettyPrintConfig, PrettyPrinter};
pub use spy::{CallRecord, CallTracker, Function, Spy};
pub use value::{ArrayRef, Kind, MapRef, ObjectRef, SetRef, Shared, Value};

// Asymmetric matchers
pub use asymmetric::{
    any, anything, empty, falsy, not_empty, truthy, Any, Anything, AsymmetricMatcher, Empty,
    Falsy, NotEmpty, Truthy, TypeDescriptor,
};
pub use containing::{
    array_containing, array_with_exact_contents, map_containing, object_containing,
    set_containing, ArrayContaining, ArrayWithExactContents, MapContaining, ObjectContaining,
    SetContaining,
};
pub use string_matching::{string_matching, StringMatching};

// Matchers and expectations
pub use call_matchers::{ToHaveBeenCalledTimes, ToHaveBeenCalledWith};
pub use expectation::{expect, Expectation, ExpectationResult};
pub use matchers::{LazyMessage, Matcher, MatcherResult, ToContain, ToEqual, ToHaveBeenCalled};

// Registry (feature-gated)
#[cfg(feature = "registry")]
pub use config::{AnyConfig, SampleConfig, StringMatchingConfig, TypedConfig, UnitConfig};
#[cfg(feature = "registry")]
pub use registry::{register_core_matchers, IntoAsymmetricMatcher, Registry, RegistryBuilder};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use expecta::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Asymmetric matcher constructors
        any,
        anything,
        array_containing,
        array_with_exact_contents,
        empty,
        // Expectations
        expect,
        falsy,
        map_containing,
        not_empty,
        object_containing,
        set_containing,
        string_matching,
        truthy,
        // Traits
        AsymmetricMatcher,
        CustomEqualityTester,
        // Core types
        DiffBuilder,
        Expectation,
        ExpectationResult,
        Function,
        MatchContext,
        Matcher,
        // Errors
        MatcherError,
        MatcherResult,
        MatchersUtil,
        PrettyPrinter,
        Spy,
        TypeDescriptor,
        Value,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum nesting depth the pretty printer descends before abbreviating
/// a container to its kind name (`Array`, `Object`, ...).
pub const MAX_PRETTY_PRINT_DEPTH: usize = 8;

/// Maximum number of array/set/map members the pretty printer emits before
/// eliding the rest with `...`.
pub const MAX_PRETTY_PRINT_ARRAY_LENGTH: usize = 50;

/// Maximum length of a single pretty-printed string.
pub const MAX_PRETTY_PRINT_CHARS: usize = 1000;

/// Maximum nesting depth for config-driven values.
///
/// Protects the recursive loader against stack exhaustion from hostile configs.
pub const MAX_DEPTH: usize = 32;

/// Maximum length for `stringMatching` regex patterns.
///
/// Regex compilation is expensive even with the linear-time Rust `regex` crate.
pub const MAX_REGEX_PATTERN_LENGTH: usize = 4096;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Usage errors from matcher construction and compare steps.
///
/// These indicate misuse of the API, never a failing assertion: a comparison
/// that simply does not match returns `pass: false` instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatcherError {
    /// `mapContaining` was given a sample that is not a map.
    #[error("You must provide a map to `mapContaining`, not {sample}")]
    MissingMap {
        /// Pretty-printed sample.
        sample: String,
    },

    /// `setContaining` was given a sample that is not a set.
    #[error("You must provide a set to `setContaining`, not {sample}")]
    MissingSet {
        /// Pretty-printed sample.
        sample: String,
    },

    /// An array matcher was given a sample that is not an array.
    #[error("You must provide an array to {matcher}, not {sample}.")]
    MissingArray {
        /// Name of the matcher (`arrayContaining`, `arrayWithExactContents`).
        matcher: &'static str,
        /// Pretty-printed sample.
        sample: String,
    },

    /// `objectContaining` was given a sample that is not an object.
    #[error("You must provide an object to objectContaining, not {sample}.")]
    MissingObject {
        /// Pretty-printed sample.
        sample: String,
    },

    /// A spy matcher was applied to something that is not a spy.
    #[error("<{matcher}> : Expected a spy, but got {actual}.\nUsage: {usage}")]
    NotASpy {
        /// Name of the matcher.
        matcher: &'static str,
        /// Usage line shown after the error.
        usage: &'static str,
        /// Pretty-printed actual value.
        actual: String,
    },

    /// `toHaveBeenCalledTimes` was called without a numeric count.
    #[error(
        "<toHaveBeenCalledTimes> : The expected times failed is a required argument and must be a number.\nUsage: expect(<spyObj>).toHaveBeenCalledTimes(<Number>)"
    )]
    ExpectedTimesRequired,

    /// A matcher that takes no expected arguments was given some.
    #[error("<{matcher}> : Does not take arguments, use toHaveBeenCalledWith\nUsage: {usage}")]
    UnexpectedArguments {
        /// Name of the matcher.
        matcher: &'static str,
        /// Usage line shown after the error.
        usage: &'static str,
    },

    /// A regex pattern is invalid.
    #[error("invalid pattern \"{pattern}\": {reason}")]
    InvalidPattern {
        /// The pattern that failed to compile.
        pattern: String,
        /// The underlying error message.
        reason: String,
    },

    /// A regex pattern exceeds [`MAX_REGEX_PATTERN_LENGTH`].
    #[error("pattern length is {len}, but maximum allowed is {max}")]
    PatternTooLong {
        /// Actual length of the pattern.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// Configuration deserialization or construction failed.
    #[error("invalid config: {reason}")]
    InvalidConfig {
        /// The underlying error message.
        reason: String,
    },

    /// A config-driven value nests deeper than [`MAX_DEPTH`].
    #[error("value nesting depth is {depth}, but maximum allowed is {max}")]
    DepthExceeded {
        /// Depth at which loading stopped.
        depth: usize,
        /// Maximum allowed depth.
        max: usize,
    },

    /// A type URL was not found in the registry.
    #[error("unknown matcher type URL \"{type_url}\"{}", registered_suffix(.available))]
    UnknownTypeUrl {
        /// The unregistered type URL.
        type_url: String,
        /// Type URLs that ARE registered (for self-correcting error messages).
        available: Vec<String>,
    },
}

fn registered_suffix(available: &[String]) -> String {
    if available.is_empty() {
        " — no matcher types are registered".to_owned()
    } else {
        format!(" — registered: {}", available.join(", "))
    }
}
