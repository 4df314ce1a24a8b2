//! The shared primitive algebra: `zero`, `fill`, `combine` (`+`),
//! `to_json_fragment`/`from_json_fragment`, `children`, equality.
//!
//! A primitive tree is generic over one "datum" type `D` — the type of
//! record flowing into the root's `fill`. All primitives in one tree share
//! the same `D`, which is what makes `children()` object-safe: a `Fraction<D>`
//! or `Select<D>` can hold heterogeneous child *kinds* (a `Bag`, a `Deviate`,
//! another `Fraction`, ...) as `Box<dyn Primitive<D>>`, all reachable through
//! one trait object family.
//!
//! The present-tense/past-tense lifecycle (a primitive is either still
//! accepting `fill`s or was rebuilt frozen from the wire) is modeled as one
//! concrete struct per primitive with an `Option<Quantity<..>>` field:
//! `Some` is present-tense (fillable), `None` is past-tense (frozen,
//! constructed by the registry from the wire). `fill` on a `None` quantity
//! returns `AggError::Frozen` — a runtime check rather than two separate
//! generic marker types, which keeps `children()`/`combine()` free of an
//! extra phase type parameter. See DESIGN.md for the tradeoff.

use std::any::Any;
use std::fmt::Debug;

use crate::errors::AggResult;

pub type Fragment = serde_json::Value;

/// One aggregator kind (Bag, Deviate, Fraction, Select, Count, ...).
///
/// `Send` is a supertrait, so a whole tree can move into a worker thread for
/// a map-reduce style fold: this makes `Box<dyn Primitive<D>>` itself `Send`
/// without callers needing to write `Box<dyn Primitive<D> + Send>` at every
/// call site.
pub trait Primitive<D>: Debug + Send {
    /// The registered type tag, used as the wire discriminator.
    fn type_name(&self) -> &'static str;

    /// Total weight observed; monotone non-decreasing under `fill`.
    fn entries(&self) -> f64;

    /// The quantity's wire name, if this primitive is named.
    fn quantity_name(&self) -> Option<&str>;

    /// A fresh present-tense peer: same extractor, same child shape, cleared state.
    fn zero(&self) -> Box<dyn Primitive<D>>;

    /// Update state from one weighted datum. Preconditions: present-tense,
    /// `weight` finite. Rust's static typing resolves most of the
    /// reference implementation's runtime "quantity type" checks at compile
    /// time (the extractor's return type *is* the contract); `AggError::QuantityType`
    /// remains available for a custom `Primitive` whose fill path can only
    /// validate a value's shape at runtime.
    fn fill(&mut self, datum: &D, weight: f64) -> AggResult<()>;

    /// Associative, commutative combine. Returns a new instance; inputs are
    /// unmodified. Fails with `AggError::ShapeMismatch` if `other` is not the
    /// same concrete kind (checked via `as_any`/downcast in each impl).
    fn combine(&self, other: &dyn Primitive<D>) -> AggResult<Box<dyn Primitive<D>>>;

    /// Emit this primitive's wire payload. `suppress_name` omits the `name`
    /// field when a parent has already recorded it under `"sub:name"`.
    fn to_json_fragment(&self, suppress_name: bool) -> Fragment;

    /// Sub-aggregators, for tree walking. Empty for Bag/Deviate/Count.
    fn children(&self) -> Vec<&dyn Primitive<D>>;

    /// Type-erased view of `self`, used by `combine` impls to downcast `other`.
    fn as_any(&self) -> &dyn Any;
}
