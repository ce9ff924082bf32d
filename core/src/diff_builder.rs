//! Path-annotated mismatch records
//!
//! The comparator descends into containers through
//! [`DiffBuilder::with_path`] and reports every mismatch it finds at the
//! current path. The accumulated records become the body of a `toEqual`
//! failure message.

use std::fmt;

use crate::{PrettyPrinter, Value};

/// One step of an [`ObjectPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Array index (`[0]`).
    Index(usize),
    /// Property or map key (`.name`, `['odd key']`).
    Key(String),
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_owned())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

/// Location of a node relative to the root of a comparison.
///
/// Displays as the empty string at the root, otherwise as `$` followed by the
/// segments: `$[0].name`, `$['odd key']`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectPath {
    segments: Vec<PathSegment>,
}

impl ObjectPath {
    /// The root path.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Number of segments (zero at the root).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The segments, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return Ok(());
        }
        f.write_str("$")?;
        for segment in &self.segments {
            match segment {
                PathSegment::Index(i) => write!(f, "[{i}]")?,
                PathSegment::Key(k) if is_identifier(k) => write!(f, ".{k}")?,
                PathSegment::Key(k) => write!(f, "['{k}']")?,
            }
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DiffBuilder
// ═══════════════════════════════════════════════════════════════════════════════

/// Accumulates mismatch records during a comparison.
///
/// A [disabled](Self::disabled) builder records nothing and never formats.
///
/// # Example
///
/// ```
/// use expecta::{DiffBuilder, MatchersUtil, Value};
///
/// let util = MatchersUtil::new();
/// let mut diff = DiffBuilder::new();
/// let expected = Value::object([("a", Value::from(1))]);
/// let actual = Value::object([("a", Value::from(2))]);
///
/// assert!(!util.equals_with_diff(&expected, &actual, &mut diff));
/// assert_eq!(diff.message(), "Expected $.a = 2 to equal 1.");
/// ```
#[derive(Debug, Clone)]
pub struct DiffBuilder {
    enabled: bool,
    path: ObjectPath,
    records: Vec<String>,
}

impl Default for DiffBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffBuilder {
    /// A recording builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            enabled: true,
            path: ObjectPath::root(),
            records: Vec::new(),
        }
    }

    /// A builder that ignores every record.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Returns `true` if this builder keeps records.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The current path.
    #[must_use]
    pub fn path(&self) -> &ObjectPath {
        &self.path
    }

    /// Run `f` one level deeper, at `segment`.
    pub fn with_path<R>(
        &mut self,
        segment: impl Into<PathSegment>,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        self.path.segments.push(segment.into());
        let result = f(self);
        self.path.segments.pop();
        result
    }

    /// Record the default mismatch text at the current path:
    /// `Expected <path> = <actual> to equal <expected>.`
    pub fn record_mismatch(&mut self, expected: &Value, actual: &Value, pp: &dyn PrettyPrinter) {
        self.record_with(|path| {
            let at = if path.depth() > 0 {
                format!("{path} = ")
            } else {
                String::new()
            };
            let (actual, expected) = (pp.pp(actual), pp.pp(expected));
            format!("Expected {at}{actual} to equal {expected}.")
        });
    }

    /// Record custom text for the current path. `format` only runs when the
    /// builder is enabled.
    pub fn record_with(&mut self, format: impl FnOnce(&ObjectPath) -> String) {
        if self.enabled {
            let record = format(&self.path);
            self.records.push(record);
        }
    }

    /// The records, in the order they were made.
    #[must_use]
    pub fn records(&self) -> &[String] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records joined by newlines.
    #[must_use]
    pub fn message(&self) -> String {
        self.records.join("\n")
    }

    /// [`message`](Self::message) with `prefix` in front of every line.
    #[must_use]
    pub fn indented(&self, prefix: &str) -> String {
        if self.records.is_empty() {
            return String::new();
        }
        indent(&self.message(), prefix)
    }
}

/// Prefix every line of `text` with `prefix`.
#[must_use]
pub fn indent(text: &str, prefix: &str) -> String {
    text.split('\n')
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
