//! Pretty printing of values for failure messages and matcher displays
//!
//! The printer is injected into the comparison context, never reached through
//! a global. [`DefaultPrettyPrinter`] produces the familiar format:
//!
//! | Value | Printed |
//! |---|---|
//! | string | `'text'` |
//! | number | `1.5`, `-0`, `NaN`, `Infinity` |
//! | array | `[ 1, 2 ]` |
//! | object | `Object({ a: 1 })` |
//! | map | `Map( [ 'a', 1 ] )` |
//! | set | `Set( 1, 2 )` |
//! | function | `Function` |
//! | spy | `spy on <identity>` |
//! | matcher | its `jasmine_to_string` |

use crate::value::format_number;
use crate::{
    Value, MAX_PRETTY_PRINT_ARRAY_LENGTH, MAX_PRETTY_PRINT_CHARS, MAX_PRETTY_PRINT_DEPTH,
};

/// Renders a value as human-readable text.
pub trait PrettyPrinter: Send + Sync {
    /// Pretty-print `value`.
    fn pp(&self, value: &Value) -> String;
}

impl<F> PrettyPrinter for F
where
    F: Fn(&Value) -> String + Send + Sync,
{
    fn pp(&self, value: &Value) -> String {
        self(value)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Configuration
// ═══════════════════════════════════════════════════════════════════════════════

/// Limits applied by [`DefaultPrettyPrinter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PrettyPrintConfig {
    /// Containers nested deeper than this print as their kind name.
    pub max_depth: usize,
    /// Members beyond this count are elided with `...`.
    pub max_array_length: usize,
    /// Output longer than this is cut and suffixed with `...`.
    pub max_chars: usize,
}

impl Default for PrettyPrintConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_PRETTY_PRINT_DEPTH,
            max_array_length: MAX_PRETTY_PRINT_ARRAY_LENGTH,
            max_chars: MAX_PRETTY_PRINT_CHARS,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Default printer
// ═══════════════════════════════════════════════════════════════════════════════

/// The stock pretty printer.
///
/// # Example
///
/// ```
/// use expecta::{DefaultPrettyPrinter, PrettyPrinter, Value};
///
/// let pp = DefaultPrettyPrinter::new();
/// let value = Value::object([("a", Value::array([Value::from(1), Value::from("x")]))]);
/// assert_eq!(pp.pp(&value), "Object({ a: [ 1, 'x' ] })");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPrettyPrinter {
    config: PrettyPrintConfig,
}

impl DefaultPrettyPrinter {
    /// A printer with the default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A printer with custom limits.
    #[must_use]
    pub fn with_config(config: PrettyPrintConfig) -> Self {
        Self { config }
    }

    /// The limits in effect.
    #[must_use]
    pub fn config(&self) -> &PrettyPrintConfig {
        &self.config
    }
}

impl PrettyPrinter for DefaultPrettyPrinter {
    fn pp(&self, value: &Value) -> String {
        let mut walk = Walk {
            printer: self,
            out: String::new(),
            seen: Vec::new(),
        };
        walk.value(value, 0);

        let mut out = walk.out;
        if out.chars().count() > self.config.max_chars {
            out = out.chars().take(self.config.max_chars).collect();
            out.push_str("...");
        }
        out
    }
}

struct Walk<'a> {
    printer: &'a DefaultPrettyPrinter,
    out: String,
    /// Identities of the containers currently being printed.
    seen: Vec<usize>,
}

impl Walk<'_> {
    fn value(&mut self, value: &Value, depth: usize) {
        match value {
            Value::Undefined => self.out.push_str("undefined"),
            Value::Null => self.out.push_str("null"),
            Value::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => self.out.push_str(&format_number(*n)),
            Value::String(s) => {
                self.out.push('\'');
                self.out.push_str(s);
                self.out.push('\'');
            }
            Value::Function(_) => self.out.push_str("Function"),
            Value::Spy(spy) => {
                self.out.push_str("spy on ");
                self.out.push_str(spy.identity());
            }
            Value::Matcher(m) => self.out.push_str(&m.jasmine_to_string(self.printer)),
            Value::Array(_) | Value::Object(_) | Value::Map(_) | Value::Set(_) => {
                self.container(value, depth);
            }
        }
    }

    fn container(&mut self, value: &Value, depth: usize) {
        let kind = value.kind().name();
        let Some(id) = value.identity() else {
            return;
        };
        if self.seen.contains(&id) {
            self.out.push_str("<circular reference: ");
            self.out.push_str(kind);
            self.out.push('>');
            return;
        }
        if depth >= self.printer.config.max_depth {
            self.out.push_str(kind);
            return;
        }

        self.seen.push(id);
        match value {
            Value::Array(items) => {
                let items = items.read();
                self.out.push_str("[ ");
                self.members(items.iter(), |walk, item| walk.value(item, depth + 1));
                self.out.push_str(" ]");
            }
            Value::Set(members) => {
                let members = members.read();
                self.out.push_str("Set( ");
                self.members(members.iter(), |walk, m| walk.value(m, depth + 1));
                self.out.push_str(" )");
            }
            Value::Map(entries) => {
                let entries = entries.read();
                self.out.push_str("Map( ");
                self.members(entries.iter(), |walk, (k, v)| {
                    walk.out.push_str("[ ");
                    walk.value(k, depth + 1);
                    walk.out.push_str(", ");
                    walk.value(v, depth + 1);
                    walk.out.push_str(" ]");
                });
                self.out.push_str(" )");
            }
            Value::Object(props) => {
                let props = props.read();
                self.out.push_str("Object({ ");
                self.members(props.iter(), |walk, (k, v)| {
                    walk.out.push_str(k);
                    walk.out.push_str(": ");
                    walk.value(v, depth + 1);
                });
                self.out.push_str(" })");
            }
            _ => {}
        }
        self.seen.pop();
    }

    fn members<I, T>(&mut self, iter: I, mut each: impl FnMut(&mut Self, T))
    where
        I: ExactSizeIterator<Item = T>,
    {
        let total = iter.len();
        let limit = self.printer.config.max_array_length;
        for (i, item) in iter.take(limit).enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            each(self, item);
        }
        if total > limit {
            self.out.push_str(if limit > 0 { ", ..." } else { "..." });
        }
    }
}
