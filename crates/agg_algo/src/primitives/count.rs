//! Count: the minimal primitive, used as the leaf aggregator inside
//! Fraction/Select scenarios that only need an entries total (for example
//! `Fraction(x -> x>0, Count)`, `Select(x -> x, Count)`).
//!
//! Count has no quantity/extractor of its own (every `fill` just adds
//! `weight`); unlike the other primitives it is fillable/frozen via a
//! plain flag rather than `Option<Quantity<..>>` since there is no
//! extractor to hold in the present-tense case.

use std::any::Any;

use agg_core::errors::{AggError, AggResult};
use agg_core::numeric::validate_weight;
use agg_core::primitive::{Fragment, Primitive};
use agg_core::registry::Registry;
use agg_io::value::{decode_f64_field, decode_opt_str_field};
use serde_json::Value;

pub struct Count<D> {
    entries: f64,
    fillable: bool,
    name: Option<String>,
    _marker: std::marker::PhantomData<fn(&D)>,
}

impl<D> std::fmt::Debug for Count<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Count")
            .field("entries", &self.entries)
            .field("fillable", &self.fillable)
            .field("name", &self.name)
            .finish()
    }
}

impl<D> Count<D> {
    pub fn new() -> Self {
        Count {
            entries: 0.0,
            fillable: true,
            name: None,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Count {
            entries: 0.0,
            fillable: true,
            name: Some(name.into()),
            _marker: std::marker::PhantomData,
        }
    }
}

impl<D> Default for Count<D> {
    fn default() -> Self {
        Count::new()
    }
}

impl<D: 'static> Primitive<D> for Count<D> {
    fn type_name(&self) -> &'static str {
        "Count"
    }

    fn entries(&self) -> f64 {
        self.entries
    }

    fn quantity_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn zero(&self) -> Box<dyn Primitive<D>> {
        Box::new(Count {
            entries: 0.0,
            fillable: self.fillable,
            name: self.name.clone(),
            _marker: std::marker::PhantomData,
        })
    }

    fn fill(&mut self, _datum: &D, weight: f64) -> AggResult<()> {
        if !self.fillable {
            return Err(AggError::Frozen { primitive: "Count" });
        }
        validate_weight(weight)?;
        if weight > 0.0 {
            self.entries += weight;
        }
        Ok(())
    }

    fn combine(&self, other: &dyn Primitive<D>) -> AggResult<Box<dyn Primitive<D>>> {
        let other = other
            .as_any()
            .downcast_ref::<Count<D>>()
            .ok_or(AggError::ShapeMismatch {
                left: "Count",
                right: other.type_name(),
            })?;
        Ok(Box::new(Count {
            entries: self.entries + other.entries,
            fillable: self.fillable,
            name: self.name.clone(),
            _marker: std::marker::PhantomData,
        }))
    }

    fn to_json_fragment(&self, suppress_name: bool) -> Fragment {
        let mut obj = serde_json::Map::new();
        obj.insert("entries".to_string(), agg_io::value::encode_f64(self.entries));
        if !suppress_name {
            if let Some(name) = &self.name {
                obj.insert("name".to_string(), Value::String(name.clone()));
            }
        }
        Value::Object(obj)
    }

    fn children(&self) -> Vec<&dyn Primitive<D>> {
        Vec::new()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub fn from_json_fragment<D: 'static>(
    _registry: &Registry<D>,
    fragment: &Fragment,
    name_from_parent: Option<&str>,
) -> AggResult<Box<dyn Primitive<D>>> {
    let entries = decode_f64_field(fragment, "entries")?;
    let name = decode_opt_str_field(fragment, "name")
        .or(name_from_parent)
        .map(str::to_string);
    Ok(Box::new(Count::<D> {
        entries,
        fillable: false,
        name,
        _marker: std::marker::PhantomData,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_weight_unconditionally() {
        let mut c: Count<f64> = Count::new();
        c.fill(&1.0, 1.0).unwrap();
        c.fill(&2.0, 2.5).unwrap();
        assert_eq!(c.entries(), 3.5);
    }

    #[test]
    fn negative_weight_is_a_no_op() {
        let mut c: Count<f64> = Count::new();
        c.fill(&1.0, -1.0).unwrap();
        assert_eq!(c.entries(), 0.0);
    }

    #[test]
    fn combine_sums_entries() {
        let mut a: Count<f64> = Count::new();
        let mut b: Count<f64> = Count::new();
        a.fill(&1.0, 2.0).unwrap();
        b.fill(&1.0, 3.0).unwrap();
        let combined = a.combine(&b).unwrap();
        assert_eq!(combined.entries(), 5.0);
    }

    #[test]
    fn frozen_instance_rejects_fill() {
        let registry: Registry<f64> = Registry::new();
        let fragment = serde_json::json!({"entries": 3.0});
        let frozen = from_json_fragment::<f64>(&registry, &fragment, None).unwrap();
        let mut frozen = frozen;
        let err = frozen.fill(&1.0, 1.0).unwrap_err();
        assert!(matches!(err, AggError::Frozen { .. }));
    }
}
