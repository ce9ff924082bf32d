//! `Value` — the dynamic data model compared by the engine
//!
//! Primitives are stored inline. Containers (`Array`, `Object`, `Map`, `Set`)
//! are [`Shared`] handles: cloning a `Value` clones the handle, not the
//! contents, so two handles can point at the same container and a container
//! can (indirectly) contain itself. Container identity is what the comparator
//! uses to defuse cycles.
//!
//! # Example
//!
//! ```
//! use expecta::Value;
//!
//! let list = Value::array([Value::from(1), Value::from("two")]);
//! let alias = list.clone();
//! assert!(list.same_identity(&alias));
//! assert_eq!(list.size(), Some(2));
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{AsymmetricMatcher, DefaultPrettyPrinter, Function, PrettyPrinter, Spy};

// ═══════════════════════════════════════════════════════════════════════════════
// Shared container handle
// ═══════════════════════════════════════════════════════════════════════════════

/// Shared, identity-bearing handle to mutable container contents.
///
/// Reads use recursive read locks: comparing a container with itself (or
/// walking a cycle) takes the same read lock more than once on one thread.
pub struct Shared<T>(Arc<RwLock<T>>);

impl<T> Shared<T> {
    /// Wrap `inner` in a fresh handle with its own identity.
    pub fn new(inner: T) -> Self {
        Self(Arc::new(RwLock::new(inner)))
    }

    /// Borrow the contents for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.0.read_recursive()
    }

    /// Borrow the contents for writing.
    ///
    /// Must not be called while a read guard from the same handle is alive.
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.0.write()
    }

    /// Returns `true` if both handles point at the same container.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address-based identity of the container.
    #[must_use]
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

impl<T: Clone> Shared<T> {
    /// Clone the current contents out from under the lock.
    #[must_use]
    pub fn snapshot(&self) -> T {
        self.read().clone()
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

/// Handle to an ordered sequence.
pub type ArrayRef = Shared<Vec<Value>>;

/// Handle to a keyed record with insertion-ordered string keys.
pub type ObjectRef = Shared<IndexMap<String, Value>>;

/// Handle to an insertion-ordered map whose keys may be any value.
pub type MapRef = Shared<Vec<(Value, Value)>>;

/// Handle to an insertion-ordered collection of unique values.
pub type SetRef = Shared<Vec<Value>>;

impl Shared<Vec<Value>> {
    /// Append a value (array semantics: duplicates allowed).
    pub fn push(&self, value: Value) {
        self.write().push(value);
    }

    /// Add a value unless a same-value-zero member is already present
    /// (set semantics). Returns `true` if the value was added.
    pub fn add(&self, value: Value) -> bool {
        let mut members = self.write();
        if members.iter().any(|m| m.same_value_zero(&value)) {
            return false;
        }
        members.push(value);
        true
    }
}

impl Shared<IndexMap<String, Value>> {
    /// Set a property, keeping the original position of an existing key.
    pub fn insert(&self, key: impl Into<String>, value: Value) {
        self.write().insert(key.into(), value);
    }
}

impl Shared<Vec<(Value, Value)>> {
    /// Set an entry, replacing the value of a same-value-zero key in place.
    pub fn set(&self, key: Value, value: Value) {
        let mut entries = self.write();
        if let Some(entry) = entries.iter_mut().find(|(k, _)| k.same_value_zero(&key)) {
            entry.1 = value;
        } else {
            entries.push((key, value));
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Value
// ═══════════════════════════════════════════════════════════════════════════════

/// A dynamic value as seen by the matching engine.
///
/// # Variants
///
/// - `Undefined` / `Null` — absent values (both falsy, neither matches `anything()`)
/// - `Bool`, `Number`, `String` — primitives
/// - `Array`, `Object`, `Map`, `Set` — shared containers (see [`Shared`])
/// - `Function` — a plain, named function
/// - `Spy` — a function stand-in that records its calls
/// - `Matcher` — an asymmetric matcher used on the expected side
#[derive(Clone)]
pub enum Value {
    /// No value.
    Undefined,
    /// Explicit null.
    Null,
    /// Boolean.
    Bool(bool),
    /// IEEE-754 double.
    Number(f64),
    /// Text.
    String(String),
    /// Ordered sequence.
    Array(ArrayRef),
    /// Keyed record (own keys only, insertion-ordered).
    Object(ObjectRef),
    /// Map with arbitrary keys.
    Map(MapRef),
    /// Collection of unique values.
    Set(SetRef),
    /// Plain function.
    Function(Function),
    /// Recording function stand-in.
    Spy(Spy),
    /// Asymmetric matcher.
    Matcher(Arc<dyn AsymmetricMatcher>),
}

/// The runtime kind of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `Value::Undefined`.
    Undefined,
    /// `Value::Null`.
    Null,
    /// `Value::Bool`.
    Boolean,
    /// `Value::Number`.
    Number,
    /// `Value::String`.
    String,
    /// `Value::Array`.
    Array,
    /// `Value::Object`.
    Object,
    /// `Value::Map`.
    Map,
    /// `Value::Set`.
    Set,
    /// `Value::Function`.
    Function,
    /// `Value::Spy`.
    Spy,
    /// `Value::Matcher`.
    Matcher,
}

impl Kind {
    /// Human-readable kind name, as used in diff messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Boolean => "Boolean",
            Self::Number => "Number",
            Self::String => "String",
            Self::Array => "Array",
            Self::Object => "Object",
            Self::Map => "Map",
            Self::Set => "Set",
            Self::Function | Self::Spy => "Function",
            Self::Matcher => "AsymmetricMatcher",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Build an array from an iterator of values.
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Self::Array(Shared::new(items.into_iter().collect()))
    }

    /// Build an object from `(key, value)` pairs. Later duplicates overwrite earlier ones.
    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        let props = entries.into_iter().map(|(k, v)| (k.into(), v));
        Self::Object(Shared::new(props.collect()))
    }

    /// Build a map from `(key, value)` pairs, replacing same-value-zero keys.
    pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        let map = MapRef::new(Vec::new());
        for (key, value) in entries {
            map.set(key, value);
        }
        Self::Map(map)
    }

    /// Build a set from values, dropping same-value-zero duplicates.
    pub fn set(members: impl IntoIterator<Item = Value>) -> Self {
        let set = SetRef::new(Vec::new());
        for member in members {
            set.add(member);
        }
        Self::Set(set)
    }

    /// Wrap an asymmetric matcher.
    pub fn matcher(matcher: impl AsymmetricMatcher + 'static) -> Self {
        Self::Matcher(Arc::new(matcher))
    }

    /// A new plain function with the given name.
    pub fn function(name: impl Into<String>) -> Self {
        Self::Function(Function::new(name))
    }

    /// The runtime kind of this value.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Undefined => Kind::Undefined,
            Self::Null => Kind::Null,
            Self::Bool(_) => Kind::Boolean,
            Self::Number(_) => Kind::Number,
            Self::String(_) => Kind::String,
            Self::Array(_) => Kind::Array,
            Self::Object(_) => Kind::Object,
            Self::Map(_) => Kind::Map,
            Self::Set(_) => Kind::Set,
            Self::Function(_) => Kind::Function,
            Self::Spy(_) => Kind::Spy,
            Self::Matcher(_) => Kind::Matcher,
        }
    }

    /// Returns `true` for `Undefined`.
    #[inline]
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns `true` for `Null`.
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for `Undefined` or `Null`.
    #[inline]
    #[must_use]
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    /// Returns `true` for an asymmetric matcher.
    #[inline]
    #[must_use]
    pub fn is_matcher(&self) -> bool {
        matches!(self, Self::Matcher(_))
    }

    /// Try to get the value as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Try to get the value as a number.
    #[inline]
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as a boolean.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as a spy.
    #[inline]
    #[must_use]
    pub fn as_spy(&self) -> Option<&Spy> {
        match self {
            Self::Spy(spy) => Some(spy),
            _ => None,
        }
    }

    /// Boolean coercion: `false`, `0`, `-0`, `NaN`, `""`, `null` and
    /// `undefined` are falsy; everything else is truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Number of members of a sized value: characters of a string, elements of
    /// an array or set, keys of an object, entries of a map. `None` for
    /// everything else.
    #[must_use]
    pub fn size(&self) -> Option<usize> {
        match self {
            Self::String(s) => Some(s.chars().count()),
            Self::Array(items) | Self::Set(items) => Some(items.read().len()),
            Self::Object(props) => Some(props.read().len()),
            Self::Map(entries) => Some(entries.read().len()),
            _ => None,
        }
    }

    /// Text coercion for primitives (`-0` becomes `"0"`). `None` for values
    /// without a meaningful text form.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Number(n) if *n == 0.0 => Some("0".to_owned()),
            Self::Number(n) => Some(format_number(*n)),
            Self::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Identity of a reference value (containers, functions, spies, matchers).
    #[must_use]
    pub fn identity(&self) -> Option<usize> {
        match self {
            Self::Array(items) | Self::Set(items) => Some(items.id()),
            Self::Object(props) => Some(props.id()),
            Self::Map(entries) => Some(entries.id()),
            Self::Function(f) => Some(f.id()),
            Self::Spy(spy) => Some(spy.id()),
            Self::Matcher(m) => Some(Arc::as_ptr(m).cast::<()>() as usize),
            _ => None,
        }
    }

    /// Returns `true` if both values are the same reference value.
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        match (self.identity(), other.identity()) {
            (Some(a), Some(b)) => a == b && self.kind() == other.kind(),
            _ => false,
        }
    }

    /// Same-value-zero: primitives by value (`NaN` equals `NaN`, `0` equals
    /// `-0`), reference values by identity. This is the key equality of maps
    /// and the membership test of sets.
    #[must_use]
    pub fn same_value_zero(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => numbers_equal(*a, *b),
            (Self::String(a), Self::String(b)) => a == b,
            _ => self.same_identity(other),
        }
    }
}

/// Number equality where `NaN` equals `NaN` and signed zeros are equal.
#[inline]
pub(crate) fn numbers_equal(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Render a number the way the pretty printer shows it.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_owned()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{sign}Infinity")
    } else if n == 0.0 && n.is_sign_negative() {
        "-0".to_owned()
    } else if n != 0.0 && !(1e-6..1e21).contains(&n.abs()) {
        // Exponent form with an explicit sign: `1e+21`, `1.5e-7`.
        let text = format!("{n:e}");
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => text,
        }
    } else {
        format!("{n}")
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&DefaultPrettyPrinter::new().pp(self))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Conversions
// ═══════════════════════════════════════════════════════════════════════════════

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    #[allow(clippy::cast_precision_loss)] // values beyond 2^53 round, as in any double
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<usize> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(n: usize) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::array(items)
    }
}

impl From<Spy> for Value {
    fn from(spy: Spy) -> Self {
        Self::Spy(spy)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Self::Function(f)
    }
}

impl From<Arc<dyn AsymmetricMatcher>> for Value {
    fn from(m: Arc<dyn AsymmetricMatcher>) -> Self {
        Self::Matcher(m)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Undefined, Into::into)
    }
}
