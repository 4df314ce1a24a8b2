//! Select: gate a child aggregator behind a cut.
//!
//! `fill`: `w = quantity(datum) * weight`; the child only sees `w` when
//! `w > 0`; `entries` advances by `weight` unconditionally, same as
//! `Fraction`. Unlike `Fraction`'s `"sub:name"`, the wire form here nests the
//! child's own fragment with its name intact (`to_json_fragment(false)`) —
//! `Select` has no paired sibling to share a name with.

use std::any::Any;

use agg_core::errors::{AggError, AggResult};
use agg_core::numeric::validate_weight;
use agg_core::primitive::{Fragment, Primitive};
use agg_core::quantity::Quantity;
use agg_core::registry::Registry;
use agg_io::value::{decode_f64_field, decode_opt_str_field, decode_str_field};
use serde_json::Value;

pub struct Select<D> {
    entries: f64,
    selector: Option<Quantity<D, f64>>,
    name: Option<String>,
    cut: Box<dyn Primitive<D>>,
}

impl<D> std::fmt::Debug for Select<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Select")
            .field("entries", &self.entries)
            .field("name", &self.name)
            .field("cut", &self.cut)
            .finish()
    }
}

impl<D: 'static> Select<D> {
    pub fn new(selector: Quantity<D, f64>, cut: Box<dyn Primitive<D>>) -> Self {
        let name = selector.name().to_string();
        Select {
            entries: 0.0,
            selector: Some(selector),
            name: Some(name),
            cut,
        }
    }

    pub fn cut(&self) -> &dyn Primitive<D> {
        self.cut.as_ref()
    }

    pub fn fraction_passing(&self) -> f64 {
        self.cut.entries() / self.entries
    }
}

impl<D: 'static> Primitive<D> for Select<D> {
    fn type_name(&self) -> &'static str {
        "Select"
    }

    fn entries(&self) -> f64 {
        self.entries
    }

    fn quantity_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn zero(&self) -> Box<dyn Primitive<D>> {
        Box::new(Select {
            entries: 0.0,
            selector: self.selector.clone(),
            name: self.name.clone(),
            cut: self.cut.zero(),
        })
    }

    fn fill(&mut self, datum: &D, weight: f64) -> AggResult<()> {
        let selector = self
            .selector
            .as_ref()
            .ok_or(AggError::Frozen { primitive: "Select" })?;
        validate_weight(weight)?;
        let w = selector.eval(datum) * weight;
        if w > 0.0 {
            self.cut.fill(datum, w)?;
        }
        self.entries += weight;
        Ok(())
    }

    fn combine(&self, other: &dyn Primitive<D>) -> AggResult<Box<dyn Primitive<D>>> {
        let other = other
            .as_any()
            .downcast_ref::<Select<D>>()
            .ok_or(AggError::ShapeMismatch {
                left: "Select",
                right: other.type_name(),
            })?;
        let cut = self.cut.combine(other.cut.as_ref())?;
        Ok(Box::new(Select {
            entries: self.entries + other.entries,
            selector: self.selector.clone(),
            name: self.name.clone(),
            cut,
        }))
    }

    fn to_json_fragment(&self, suppress_name: bool) -> Fragment {
        let mut obj = serde_json::Map::new();
        obj.insert("entries".to_string(), agg_io::value::encode_f64(self.entries));
        obj.insert("type".to_string(), Value::String(self.cut.type_name().to_string()));
        obj.insert("data".to_string(), self.cut.to_json_fragment(false));
        if !suppress_name {
            if let Some(name) = &self.name {
                obj.insert("name".to_string(), Value::String(name.clone()));
            }
        }
        Value::Object(obj)
    }

    fn children(&self) -> Vec<&dyn Primitive<D>> {
        vec![self.cut.as_ref()]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub fn from_json_fragment<D: 'static>(
    registry: &Registry<D>,
    fragment: &Fragment,
    name_from_parent: Option<&str>,
) -> AggResult<Box<dyn Primitive<D>>> {
    let entries = decode_f64_field(fragment, "entries")?;
    let child_type = decode_str_field(fragment, "type")?;
    let data = fragment.get("data").ok_or_else(|| AggError::WireFormat {
        pointer: "/data".to_string(),
        detail: "missing required field".to_string(),
    })?;
    let cut = registry.build(child_type, data, None)?;
    let name = decode_opt_str_field(fragment, "name")
        .or(name_from_parent)
        .map(str::to_string);
    Ok(Box::new(Select::<D> {
        entries,
        selector: None,
        name,
        cut,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::count::Count;

    #[test]
    fn cut_counts_only_passing_weight() {
        let selector = Quantity::new("x", |d: &f64| *d);
        let mut select: Select<f64> = Select::new(selector, Box::new(Count::<f64>::new()));
        for d in [0.0, 2.0, 3.0] {
            select.fill(&d, 1.0).unwrap();
        }
        assert_eq!(select.entries(), 3.0);
        assert_eq!(select.cut().entries(), 5.0);
    }

    #[test]
    fn combine_sums_entries_and_cut() {
        let selector = Quantity::new("x", |d: &f64| *d);
        let mut a: Select<f64> = Select::new(selector.clone(), Box::new(Count::<f64>::new()));
        let mut b: Select<f64> = Select::new(selector, Box::new(Count::<f64>::new()));
        a.fill(&1.0, 1.0).unwrap();
        b.fill(&2.0, 1.0).unwrap();
        let combined = a.combine(&b).unwrap();
        assert_eq!(combined.entries(), 2.0);
        assert_eq!(combined.children()[0].entries(), 3.0);
    }

    #[test]
    fn round_trips_through_json_fragment() {
        let selector = Quantity::new("x", |d: &f64| *d);
        let mut select: Select<f64> = Select::new(selector, Box::new(Count::<f64>::new()));
        select.fill(&2.0, 1.0).unwrap();
        let fragment = select.to_json_fragment(false);
        let mut registry: Registry<f64> = Registry::new();
        registry.register("Count", crate::primitives::count::from_json_fragment);
        let rebuilt = from_json_fragment::<f64>(&registry, &fragment, None).unwrap();
        assert_eq!(rebuilt.entries(), 1.0);
        assert_eq!(rebuilt.quantity_name(), Some("x"));
    }
}
