//! Functions and spies
//!
//! A [`Spy`] stands in for a function: every [`Spy::call`] is appended to its
//! invocation history, which the call-record matchers inspect afterwards.
//! History is append-only while the code under test runs and read-only at
//! match time.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::Value;

// ═══════════════════════════════════════════════════════════════════════════════
// Function
// ═══════════════════════════════════════════════════════════════════════════════

/// A plain, named function value. Compared by identity only.
#[derive(Clone)]
pub struct Function {
    name: Arc<str>,
}

impl Function {
    /// Create a new function with its own identity.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Arc::from(name.into()),
        }
    }

    /// The function's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if both handles refer to the same function.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.name, &other.name)
    }

    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.name).cast::<u8>() as usize
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Function").field(&self.name).finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Call history
// ═══════════════════════════════════════════════════════════════════════════════

/// One recorded invocation of a spy.
#[derive(Debug, Clone)]
pub struct CallRecord {
    /// The arguments the spy was called with.
    pub args: Vec<Value>,
    /// What the spy returned.
    pub return_value: Value,
}

/// Read-only view of a spy's invocation history.
#[derive(Debug, Clone)]
pub struct CallTracker {
    calls: Vec<CallRecord>,
}

impl CallTracker {
    /// Returns `true` if the spy was called at least once.
    #[must_use]
    pub fn any(&self) -> bool {
        !self.calls.is_empty()
    }

    /// Number of recorded calls.
    #[must_use]
    pub fn count(&self) -> usize {
        self.calls.len()
    }

    /// Arguments of the call at `index`.
    #[must_use]
    pub fn args_for(&self, index: usize) -> Option<&[Value]> {
        self.calls.get(index).map(|call| call.args.as_slice())
    }

    /// Arguments of every call, in call order.
    #[must_use]
    pub fn all_args(&self) -> Vec<Vec<Value>> {
        self.calls.iter().map(|call| call.args.clone()).collect()
    }

    /// The first recorded call.
    #[must_use]
    pub fn first(&self) -> Option<&CallRecord> {
        self.calls.first()
    }

    /// The most recent recorded call.
    #[must_use]
    pub fn most_recent(&self) -> Option<&CallRecord> {
        self.calls.last()
    }

    /// Every recorded call, in call order.
    #[must_use]
    pub fn all(&self) -> &[CallRecord] {
        &self.calls
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Spy
// ═══════════════════════════════════════════════════════════════════════════════

struct SpyInner {
    identity: String,
    calls: RwLock<Vec<CallRecord>>,
    return_value: RwLock<Value>,
}

/// A recording function stand-in.
///
/// Cloning a `Spy` clones the handle: calls made through any clone land in
/// the same history.
///
/// # Example
///
/// ```
/// use expecta::{Spy, Value};
///
/// let spy = Spy::new("onSave");
/// spy.and_return(Value::from(true));
///
/// assert!(spy.call([Value::from("draft")]).is_truthy());
/// assert_eq!(spy.calls().count(), 1);
/// assert_eq!(spy.calls().args_for(0).map(<[Value]>::len), Some(1));
/// ```
#[derive(Clone)]
pub struct Spy {
    inner: Arc<SpyInner>,
}

impl Spy {
    /// Create a spy with the given display identity and no calls.
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(SpyInner {
                identity: identity.into(),
                calls: RwLock::new(Vec::new()),
                return_value: RwLock::new(Value::Undefined),
            }),
        }
    }

    /// The name shown in messages (`spy on <identity>`).
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.inner.identity
    }

    /// Make every subsequent call return `value`.
    pub fn and_return(&self, value: Value) -> &Self {
        *self.inner.return_value.write() = value;
        self
    }

    /// Invoke the spy, recording the arguments and the returned value.
    pub fn call(&self, args: impl IntoIterator<Item = Value>) -> Value {
        let return_value = self.inner.return_value.read().clone();
        self.inner.calls.write().push(CallRecord {
            args: args.into_iter().collect(),
            return_value: return_value.clone(),
        });
        return_value
    }

    /// Snapshot of the invocation history.
    #[must_use]
    pub fn calls(&self) -> CallTracker {
        CallTracker {
            calls: self.inner.calls.read().clone(),
        }
    }

    /// Forget every recorded call.
    pub fn reset(&self) {
        self.inner.calls.write().clear();
    }

    /// Returns `true` if both handles refer to the same spy.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }
}

impl fmt::Debug for Spy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spy")
            .field("identity", &self.inner.identity)
            .field("calls", &self.inner.calls.read().len())
            .finish()
    }
}
