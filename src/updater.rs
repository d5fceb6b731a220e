//! Updater<T>: a replacement value or a function of the previous value.
//!
//! Both tracked-state setters take one argument that is either a literal
//! replacement or a computation from the previous value. The two forms are
//! kept as explicit variants so there is no runtime "is it callable" probe:
//! which arm a call lands in is decided by how the updater is constructed,
//! never by inspecting the payload.
//!
//! A consequence worth spelling out: when the tracked value `T` is itself a
//! callable type (a `fn` pointer, say), passing one positionally converts via
//! `From<T>` into [`Updater::Value`] and **replaces** the stored callable.
//! Only [`Updater::compute`] produces the computing arm.

use std::fmt;

// ---------------------------------------------------------------------------
// Updater
// ---------------------------------------------------------------------------

/// A pending update: either the next value outright, or a function that
/// derives the next value from a previous one.
pub enum Updater<T> {
    /// Replace the value with this one.
    Value(T),
    /// Derive the next value from the previous value.
    Compute(Box<dyn FnOnce(&T) -> T>),
}

impl<T> Updater<T> {
    /// Construct the literal arm.
    pub fn value(value: T) -> Self {
        Updater::Value(value)
    }

    /// Construct the computing arm from a closure over the previous value.
    pub fn compute(f: impl FnOnce(&T) -> T + 'static) -> Self {
        Updater::Compute(Box::new(f))
    }

    /// Whether this updater computes from the previous value.
    pub fn is_compute(&self) -> bool {
        matches!(self, Updater::Compute(_))
    }

    /// Resolve the updater against the previous value, consuming it.
    pub fn apply(self, prev: &T) -> T {
        match self {
            Updater::Value(value) => value,
            Updater::Compute(f) => f(prev),
        }
    }
}

/// A bare `T` is always the literal arm, even when `T` is callable.
impl<T> From<T> for Updater<T> {
    fn from(value: T) -> Self {
        Updater::Value(value)
    }
}

impl<T> fmt::Debug for Updater<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Updater::Value(_) => f.write_str("Updater::Value"),
            Updater::Compute(_) => f.write_str("Updater::Compute"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
