//! agg_io — Wire codec for the streaming-aggregator engine.
//!
//! A small, dependency-light crate that owns the on-disk/on-wire
//! representation and nothing else (no tabulation logic, no registry —
//! those live in `agg_algo`/`aggregator`).
//!
//! - [`canonical_json`] — sorted-key, compact, atomically-written JSON
//!   bytes; this is what makes byte-equivalent wire output across
//!   implementations checkable.
//! - [`value`] — the NaN/±∞ sentinel encoding used by every primitive's
//!   fragment.
//! - [`document`] — the top-level `{"type", "data", "version"}` wrapper.

#![forbid(unsafe_code)]

pub mod canonical_json;
pub mod document;
pub mod value;

pub use canonical_json::{to_canonical_json_bytes, write_canonical_file};
pub use document::Document;
pub use value::{decode_f64, decode_f64_field, decode_opt_str_field, decode_str_field, encode_f64};
