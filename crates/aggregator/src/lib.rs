//! aggregator — facade crate: built-in registry wiring, tree builders, and
//! the logged combine wrapper a map-reduce caller merges partial trees
//! through.
//!
//! One crate downstream of the algebra/codec crates that a binary actually
//! depends on; stays thin since there is no multi-stage pipeline to
//! orchestrate here, only wiring.

#![forbid(unsafe_code)]

pub mod prelude;

use agg_core::errors::AggResult;
use agg_core::primitive::Primitive;
use agg_core::registry::Registry;
use agg_io::document::Document;

/// Build a registry with the five built-in primitives wired in.
///
/// Generic over `D` (the library has no notion of a single process-wide
/// datum type): a binary that settles on one concrete `D` wraps this in its
/// own `once_cell::sync::Lazy<Registry<ConcreteD>>` static, for the usual
/// "build once, read everywhere" shape of a process-wide immutable table:
///
/// ```ignore
/// static REGISTRY: once_cell::sync::Lazy<agg_core::Registry<MyDatum>> =
///     once_cell::sync::Lazy::new(aggregator::builtin_registry);
/// ```
pub fn builtin_registry<D: 'static>() -> Registry<D> {
    let mut registry = Registry::new();
    registry.register("Bag", agg_algo::primitives::bag::from_json_fragment);
    registry.register("Deviate", agg_algo::primitives::deviate::from_json_fragment);
    registry.register("Count", agg_algo::primitives::count::from_json_fragment);
    registry.register("Fraction", agg_algo::primitives::fraction::from_json_fragment);
    registry.register("Select", agg_algo::primitives::select::from_json_fragment);
    tracing::debug!(types = 5, "built-in primitive registry initialized");
    registry
}

/// Rebuild a past-tense primitive tree from its top-level wire [`Document`].
pub fn load<D: 'static>(
    registry: &Registry<D>,
    doc: &Document,
) -> AggResult<Box<dyn Primitive<D>>> {
    registry.build(&doc.type_name, &doc.data, None)
}

/// Serialize a primitive tree into its top-level wire [`Document`].
pub fn dump<D>(primitive: &dyn Primitive<D>) -> Document {
    Document::new(primitive.type_name(), primitive.to_json_fragment(false))
}

/// Combine two primitives, logging a `tracing::warn!` breadcrumb on shape
/// mismatch before propagating the error. A caller merging many partial
/// trees from a map-reduce job can turn this on to see where/why a merge
/// was rejected without the `Result` itself ceasing to be authoritative.
pub fn combine_logged<D>(
    a: &dyn Primitive<D>,
    b: &dyn Primitive<D>,
) -> AggResult<Box<dyn Primitive<D>>> {
    a.combine(b).map_err(|err| {
        tracing::warn!(left = a.type_name(), right = b.type_name(), %err, "combine rejected");
        err
    })
}
