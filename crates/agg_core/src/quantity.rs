//! Quantity binding: a user extractor wrapped with a stable wire-identity name.

use std::fmt;
use std::sync::Arc;

/// A callable `datum -> value` carrying a `name` used as wire identity.
///
/// `extract` is reference-counted (`Arc`) rather than a borrowed closure:
/// trees built from a `Quantity` must be `Send` so a worker can own one
/// privately and hand the finished tree to a reducer in a map-reduce style
/// fold, which a plain `&'a dyn Fn` would prevent once the borrow outlives a
/// single stack frame. Threaded/async pipeline code consistently reaches for
/// `Arc`-wrapped closures over borrowed ones for the same reason.
pub struct Quantity<D, V> {
    name: String,
    extract: Arc<dyn Fn(&D) -> V + Send + Sync>,
}

/// Hand-written rather than derived: `#[derive(Clone)]` would add spurious
/// `D: Clone, V: Clone` bounds — `Arc::clone` only bumps a refcount and
/// needs neither.
impl<D, V> Clone for Quantity<D, V> {
    fn clone(&self) -> Self {
        Quantity {
            name: self.name.clone(),
            extract: Arc::clone(&self.extract),
        }
    }
}

impl<D, V> Quantity<D, V> {
    pub fn new(name: impl Into<String>, extract: impl Fn(&D) -> V + Send + Sync + 'static) -> Self {
        Quantity {
            name: name.into(),
            extract: Arc::new(extract),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn eval(&self, datum: &D) -> V {
        (self.extract)(datum)
    }
}

impl<D> Quantity<D, f64> {
    /// Wrap a boolean predicate as a `0.0`/`1.0` valued quantity. A
    /// Fraction/Select selector may be boolean or numeric; boolean coerces to
    /// 0/1. Rust's static typing makes the coercion a constructor choice
    /// rather than a runtime check.
    pub fn from_predicate(
        name: impl Into<String>,
        predicate: impl Fn(&D) -> bool + Send + Sync + 'static,
    ) -> Self {
        Quantity::new(name, move |d: &D| if predicate(d) { 1.0 } else { 0.0 })
    }
}

impl<D, V> fmt::Debug for Quantity<D, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quantity").field("name", &self.name).finish()
    }
}

impl<D, V> PartialEq for Quantity<D, V> {
    /// Quantities are compared by name only: the named/anonymous distinction
    /// is part of a primitive's identity, but two extractors with the same
    /// name are considered the same binding for equality purposes — the
    /// underlying closure is not introspectable.
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}
