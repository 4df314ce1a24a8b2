//! Unified error type for the aggregator core: one enum, `#[error(...)]`
//! per variant, `#[from]` for upstream error types.

use thiserror::Error;

/// Errors surfaced by `fill`, `combine`, and (de)serialization:
/// quantity-type, frozen, shape-mismatch, wire-format, unknown-type,
/// value-range, and wrapped JSON errors.
#[derive(Debug, Error)]
pub enum AggError {
    /// The quantity/extractor returned a value outside the primitive's contract
    /// (e.g. Deviate handed a non-numeric quantity). Raised before any state
    /// mutation — callers can assume the aggregator is untouched.
    #[error("quantity type error in {primitive}: {detail}")]
    QuantityType {
        primitive: &'static str,
        detail: String,
    },

    /// `fill` called on a past-tense (frozen) primitive.
    #[error("cannot fill a past-tense (frozen) {primitive}")]
    Frozen { primitive: &'static str },

    /// `combine` (`+`) applied to incompatible primitives.
    #[error("shape mismatch: cannot combine {left} with {right}")]
    ShapeMismatch {
        left: &'static str,
        right: &'static str,
    },

    /// Malformed wire fragment: missing keys, wrong value types, non-numeric entries.
    #[error("wire format error at {pointer}: {detail}")]
    WireFormat { pointer: String, detail: String },

    /// `type` tag in a wire document is not in the registry.
    #[error("unknown primitive type: {0}")]
    UnknownType(String),

    /// Negative `entries`, negative weight where prohibited, or an unenforced
    /// arity mismatch surfaced as a hard error by a caller that opted in.
    #[error("value out of range: {0}")]
    ValueRange(String),

    /// Wraps `serde_json`'s own parse errors so callers get one error type.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type AggResult<T> = Result<T, AggError>;
