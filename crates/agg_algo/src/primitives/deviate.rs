//! Deviate: numerically stable weighted mean/variance.
//!
//! `entries` accumulates *before* the NaN/inf/finite branch, and the
//! finite-path shift divides by the already-incremented `entries` — both
//! carried over verbatim below. The incremental update is the weighted
//! online variance recurrence (West 1979 / Finch 2009): `shift = delta * w /
//! entries'`, `varianceTimesEntries += w * delta * (value - mean')`.

use std::any::Any;

use agg_core::errors::{AggError, AggResult};
use agg_core::numeric::validate_weight;
use agg_core::primitive::{Fragment, Primitive};
use agg_core::quantity::Quantity;
use agg_core::registry::Registry;
use agg_io::value::{decode_f64, decode_f64_field, decode_opt_str_field};
use serde_json::Value;

/// Running weighted mean/variance over a scalar quantity.
pub struct Deviate<D> {
    entries: f64,
    mean: f64,
    variance_times_entries: f64,
    quantity: Option<Quantity<D, f64>>,
    name: Option<String>,
}

impl<D> std::fmt::Debug for Deviate<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deviate")
            .field("entries", &self.entries)
            .field("mean", &self.mean)
            .field("variance_times_entries", &self.variance_times_entries)
            .field("name", &self.name)
            .finish()
    }
}

impl<D> Deviate<D> {
    pub fn new(quantity: Quantity<D, f64>) -> Self {
        let name = quantity.name().to_string();
        Deviate {
            entries: 0.0,
            mean: 0.0,
            variance_times_entries: 0.0,
            quantity: Some(quantity),
            name: Some(name),
        }
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population variance (`varianceTimesEntries / entries`); at
    /// `entries == 0` this returns `varianceTimesEntries` verbatim (`0.0` for
    /// a fresh instance), not `NaN`, so an empty tree's wire form matches the
    /// zero-state of every other primitive.
    pub fn variance(&self) -> f64 {
        if self.entries == 0.0 {
            self.variance_times_entries
        } else {
            self.variance_times_entries / self.entries
        }
    }
}

impl<D: 'static> Primitive<D> for Deviate<D> {
    fn type_name(&self) -> &'static str {
        "Deviate"
    }

    fn entries(&self) -> f64 {
        self.entries
    }

    fn quantity_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn zero(&self) -> Box<dyn Primitive<D>> {
        Box::new(Deviate {
            entries: 0.0,
            mean: 0.0,
            variance_times_entries: 0.0,
            quantity: self.quantity.clone(),
            name: self.name.clone(),
        })
    }

    fn fill(&mut self, datum: &D, weight: f64) -> AggResult<()> {
        let quantity = self
            .quantity
            .as_ref()
            .ok_or(AggError::Frozen { primitive: "Deviate" })?;
        validate_weight(weight)?;
        if weight <= 0.0 {
            return Ok(());
        }
        let q = quantity.eval(datum);
        let new_entries = self.entries + weight;

        if self.mean.is_nan() || q.is_nan() {
            self.mean = f64::NAN;
            self.variance_times_entries = f64::NAN;
        } else if self.mean.is_infinite() || q.is_infinite() {
            if self.mean.is_infinite() && q.is_infinite() && self.mean * q < 0.0 {
                self.mean = f64::NAN;
            } else if q.is_infinite() {
                self.mean = q;
            }
            if new_entries.is_infinite() || new_entries.is_nan() {
                self.mean = f64::NAN;
            }
            self.variance_times_entries = f64::NAN;
        } else {
            let delta = q - self.mean;
            let shift = delta * weight / new_entries;
            self.mean += shift;
            self.variance_times_entries += weight * delta * (q - self.mean);
        }

        self.entries = new_entries;
        Ok(())
    }

    fn combine(&self, other: &dyn Primitive<D>) -> AggResult<Box<dyn Primitive<D>>> {
        let other = other
            .as_any()
            .downcast_ref::<Deviate<D>>()
            .ok_or(AggError::ShapeMismatch {
                left: "Deviate",
                right: other.type_name(),
            })?;

        let entries = self.entries + other.entries;
        let (mean, variance_times_entries) = if entries == 0.0 {
            ((self.mean + other.mean) / 2.0, 0.0)
        } else if self.mean.is_nan() || other.mean.is_nan() {
            (f64::NAN, f64::NAN)
        } else if self.mean.is_infinite() || other.mean.is_infinite() {
            let mean = if self.mean.is_infinite() && other.mean.is_infinite() && self.mean * other.mean < 0.0 {
                f64::NAN
            } else if self.mean.is_infinite() {
                self.mean
            } else {
                other.mean
            };
            (mean, f64::NAN)
        } else {
            let delta = other.mean - self.mean;
            let mean = (self.entries * self.mean + other.entries * other.mean) / entries;
            let variance_times_entries = self.variance_times_entries
                + other.variance_times_entries
                + delta * delta * self.entries * other.entries / entries;
            (mean, variance_times_entries)
        };

        Ok(Box::new(Deviate {
            entries,
            mean,
            variance_times_entries,
            quantity: self.quantity.clone(),
            name: self.name.clone(),
        }))
    }

    fn to_json_fragment(&self, suppress_name: bool) -> Fragment {
        let mut obj = serde_json::Map::new();
        obj.insert("entries".to_string(), agg_io::value::encode_f64(self.entries));
        obj.insert("mean".to_string(), agg_io::value::encode_f64(self.mean));
        obj.insert("variance".to_string(), agg_io::value::encode_f64(self.variance()));
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

/// Rebuild a past-tense `Deviate` from its wire fragment. The wire form
/// stores `variance` directly; `variance_times_entries` is recovered by
/// multiplying back through `entries` (0 at `entries == 0`).
pub fn from_json_fragment<D: 'static>(
    _registry: &Registry<D>,
    fragment: &Fragment,
    name_from_parent: Option<&str>,
) -> AggResult<Box<dyn Primitive<D>>> {
    let entries = decode_f64_field(fragment, "entries")?;
    let mean = decode_f64_field(fragment, "mean")?;
    let variance_raw = fragment
        .get("variance")
        .ok_or_else(|| AggError::WireFormat {
            pointer: "/variance".to_string(),
            detail: "missing required field".to_string(),
        })?;
    let variance = decode_f64(variance_raw, "/variance")?;
    let variance_times_entries = if entries == 0.0 { 0.0 } else { variance * entries };
    let name = decode_opt_str_field(fragment, "name")
        .or(name_from_parent)
        .map(str::to_string);
    Ok(Box::new(Deviate::<D> {
        entries,
        mean,
        variance_times_entries,
        quantity: None,
        name,
    }))
}
