//! agg_core — Core types for the streaming-aggregator engine.
//!
//! This crate is free of I/O and free of any concrete primitive
//! implementation. It defines the types shared across `agg_io` and
//! `agg_algo`:
//!
//! - Numeric helpers: `numeq`, `Tolerance`, `float_or_nan`, weight validation
//! - The unified error type, `AggError`
//! - The `Primitive<D>` trait (the algebra every concrete primitive honors)
//! - `Quantity<D, V>`, a named extractor binding
//! - `Registry<D>`, the name -> factory table

#![forbid(unsafe_code)]

pub mod errors;
pub mod numeric;
pub mod primitive;
pub mod quantity;
pub mod registry;

pub use errors::{AggError, AggResult};
pub use numeric::{float_or_nan, numeq, validate_weight, Tolerance};
pub use primitive::{Fragment, Primitive};
pub use quantity::Quantity;
pub use registry::{Factory, Registry};
