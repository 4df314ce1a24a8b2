//! Fraction: numerator/denominator pair driven by a selector.
//!
//! `fill`: `w = selector(datum) * weight`; the denominator always sees
//! `weight` (when positive), the numerator only sees the selected-through
//! share `w` (when positive); `entries` advances by `weight` unconditionally,
//! independent of either child update.
//! Numerator/denominator are held as `Box<dyn Primitive<D>>` rather than a
//! second generic parameter: the trait already gives them fill/combine/zero
//! via dynamic dispatch, so one uniform representation covers both the
//! present-tense (user-built) and past-tense (registry-rebuilt) cases.

use std::any::Any;

use agg_core::errors::{AggError, AggResult};
use agg_core::numeric::validate_weight;
use agg_core::primitive::{Fragment, Primitive};
use agg_core::quantity::Quantity;
use agg_core::registry::Registry;
use agg_io::value::{decode_f64_field, decode_opt_str_field, decode_str_field};
use serde_json::Value;

pub struct Fraction<D> {
    entries: f64,
    selector: Option<Quantity<D, f64>>,
    name: Option<String>,
    numerator: Box<dyn Primitive<D>>,
    denominator: Box<dyn Primitive<D>>,
}

impl<D> std::fmt::Debug for Fraction<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fraction")
            .field("entries", &self.entries)
            .field("name", &self.name)
            .field("numerator", &self.numerator)
            .field("denominator", &self.denominator)
            .finish()
    }
}

impl<D: 'static> Fraction<D> {
    /// `value` is a present-tense template; the numerator and denominator
    /// are independent zeroed copies of it, so both always share the same
    /// concrete shape.
    pub fn new(selector: Quantity<D, f64>, value: Box<dyn Primitive<D>>) -> Self {
        let name = selector.name().to_string();
        Fraction {
            entries: 0.0,
            numerator: value.zero(),
            denominator: value.zero(),
            selector: Some(selector),
            name: Some(name),
        }
    }

    pub fn numerator(&self) -> &dyn Primitive<D> {
        self.numerator.as_ref()
    }

    pub fn denominator(&self) -> &dyn Primitive<D> {
        self.denominator.as_ref()
    }
}

impl<D: 'static> Primitive<D> for Fraction<D> {
    fn type_name(&self) -> &'static str {
        "Fraction"
    }

    fn entries(&self) -> f64 {
        self.entries
    }

    fn quantity_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn zero(&self) -> Box<dyn Primitive<D>> {
        Box::new(Fraction {
            entries: 0.0,
            selector: self.selector.clone(),
            name: self.name.clone(),
            numerator: self.numerator.zero(),
            denominator: self.denominator.zero(),
        })
    }

    fn fill(&mut self, datum: &D, weight: f64) -> AggResult<()> {
        let selector = self
            .selector
            .as_ref()
            .ok_or(AggError::Frozen { primitive: "Fraction" })?;
        validate_weight(weight)?;
        let w = selector.eval(datum) * weight;
        if weight > 0.0 {
            self.denominator.fill(datum, weight)?;
        }
        if w > 0.0 {
            self.numerator.fill(datum, w)?;
        }
        self.entries += weight;
        Ok(())
    }

    fn combine(&self, other: &dyn Primitive<D>) -> AggResult<Box<dyn Primitive<D>>> {
        let other = other
            .as_any()
            .downcast_ref::<Fraction<D>>()
            .ok_or(AggError::ShapeMismatch {
                left: "Fraction",
                right: other.type_name(),
            })?;
        let numerator = self.numerator.combine(other.numerator.as_ref())?;
        let denominator = self.denominator.combine(other.denominator.as_ref())?;
        Ok(Box::new(Fraction {
            entries: self.entries + other.entries,
            selector: self.selector.clone(),
            name: self.name.clone(),
            numerator,
            denominator,
        }))
    }

    fn to_json_fragment(&self, suppress_name: bool) -> Fragment {
        let mut obj = serde_json::Map::new();
        obj.insert("entries".to_string(), agg_io::value::encode_f64(self.entries));
        obj.insert("type".to_string(), Value::String(self.numerator.type_name().to_string()));
        obj.insert("numerator".to_string(), self.numerator.to_json_fragment(true));
        obj.insert("denominator".to_string(), self.denominator.to_json_fragment(true));
        if let Some(sub_name) = self.numerator.quantity_name() {
            obj.insert("sub:name".to_string(), Value::String(sub_name.to_string()));
        }
        if !suppress_name {
            if let Some(name) = &self.name {
                obj.insert("name".to_string(), Value::String(name.clone()));
            }
        }
        Value::Object(obj)
    }

    fn children(&self) -> Vec<&dyn Primitive<D>> {
        vec![self.numerator.as_ref(), self.denominator.as_ref()]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Rebuild a past-tense `Fraction` from its wire fragment. Shape
/// compatibility between numerator and denominator is established by the
/// fact that combining them must itself succeed — no separate check is
/// needed.
pub fn from_json_fragment<D: 'static>(
    registry: &Registry<D>,
    fragment: &Fragment,
    name_from_parent: Option<&str>,
) -> AggResult<Box<dyn Primitive<D>>> {
    let entries = decode_f64_field(fragment, "entries")?;
    let child_type = decode_str_field(fragment, "type")?;
    let sub_name = decode_opt_str_field(fragment, "sub:name");
    let numerator_fragment = fragment.get("numerator").ok_or_else(|| AggError::WireFormat {
        pointer: "/numerator".to_string(),
        detail: "missing required field".to_string(),
    })?;
    let denominator_fragment = fragment.get("denominator").ok_or_else(|| AggError::WireFormat {
        pointer: "/denominator".to_string(),
        detail: "missing required field".to_string(),
    })?;
    let numerator = registry.build(child_type, numerator_fragment, sub_name)?;
    let denominator = registry.build(child_type, denominator_fragment, sub_name)?;
    numerator.combine(denominator.as_ref())?;
    let name = decode_opt_str_field(fragment, "name")
        .or(name_from_parent)
        .map(str::to_string);
    Ok(Box::new(Fraction::<D> {
        entries,
        selector: None,
        name,
        numerator,
        denominator,
    }))
}
