//! Factory registry.
//!
//! Maps a primitive's wire `type` tag to the function that rebuilds a
//! past-tense instance from a [`Fragment`]. The registry itself is generic
//! over the datum type `D`; a binary picks one concrete `D` and builds one
//! process-wide table for it, wrapped in a `once_cell::sync::Lazy` static for
//! the usual "build once, read everywhere" shape. `aggregator::prelude`
//! supplies that `Lazy` wrapper for its built-in primitives; nothing here is
//! global by itself — a caller that wants to avoid process-wide state can
//! just thread a `Registry` value through deserialization instead.

use std::collections::HashMap;

use crate::errors::{AggError, AggResult};
use crate::primitive::{Fragment, Primitive};

/// Rebuilds a past-tense primitive from its wire fragment. `name_from_parent`
/// is the quantity name to adopt when the fragment omits its own `"name"`.
/// The registry itself is threaded through so container primitives
/// (Fraction, Select) can recursively rebuild their children without needing
/// process-wide state.
pub type Factory<D> =
    fn(&Registry<D>, &Fragment, Option<&str>) -> AggResult<Box<dyn Primitive<D>>>;

/// A name -> factory table. Registration happens once at startup.
pub struct Registry<D> {
    factories: HashMap<&'static str, Factory<D>>,
}

impl<D> Registry<D> {
    pub fn new() -> Self {
        Registry {
            factories: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: &'static str, factory: Factory<D>) {
        self.factories.insert(name, factory);
    }

    /// Look up a factory by wire `type` tag. Fails with
    /// `AggError::UnknownType` for a tag not in the table.
    pub fn lookup(&self, name: &str) -> AggResult<Factory<D>> {
        self.factories
            .get(name)
            .copied()
            .ok_or_else(|| AggError::UnknownType(name.to_string()))
    }

    /// Look up and immediately invoke the factory on `fragment`.
    pub fn build(
        &self,
        name: &str,
        fragment: &Fragment,
        name_from_parent: Option<&str>,
    ) -> AggResult<Box<dyn Primitive<D>>> {
        let factory = self.lookup(name)?;
        factory(self, fragment, name_from_parent)
    }
}

impl<D> Default for Registry<D> {
    fn default() -> Self {
        Self::new()
    }
}
