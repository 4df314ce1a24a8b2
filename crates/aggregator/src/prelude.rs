//! Single-import surface for downstream crates: `use aggregator::prelude::*;`.

pub use agg_core::errors::{AggError, AggResult};
pub use agg_core::numeric::{numeq, Tolerance};
pub use agg_core::primitive::{Fragment, Primitive};
pub use agg_core::quantity::Quantity;
pub use agg_core::registry::Registry;

pub use agg_io::document::Document;
pub use agg_io::value::{decode_f64, encode_f64};
pub use agg_io::{to_canonical_json_bytes, write_canonical_file};

pub use agg_algo::primitives::{Bag, BagInput, BagKey, Count, Deviate, FloatKey, Fraction, Select};

pub use crate::{builtin_registry, combine_logged, dump, load};
