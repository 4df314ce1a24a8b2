//! agg_algo — The five built-in primitives implementing `agg_core::Primitive`.
//!
//! Each primitive lives in its own module, and `primitives::from_json_fragment`
//! functions are what a caller registers into an `agg_core::Registry`.

#![forbid(unsafe_code)]

pub mod primitives {
    pub mod bag;
    pub mod count;
    pub mod deviate;
    pub mod fraction;
    pub mod select;

    pub use bag::{Bag, BagInput, BagKey, FloatKey};
    pub use count::Count;
    pub use deviate::Deviate;
    pub use fraction::Fraction;
    pub use select::Select;
}

pub use primitives::{Bag, BagInput, BagKey, Count, Deviate, FloatKey, Fraction, Select};
