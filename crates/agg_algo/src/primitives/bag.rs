//! Bag: a weighted multiset of quantity values.
//!
//! The reference `_update` behavior keys a plain dict on whatever
//! `quantity(datum)` canonicalizes to (a float, a fixed-arity tuple of
//! floats, or a string) and never checks that kind against prior fills —
//! there is no type gate at all, intentionally: a later fill with a
//! different arity is permitted at runtime and silently produces a distinct
//! key, so `fill`/`combine` below never reject on key shape. A
//! `BTreeMap<BagKey, f64>` gives the canonical ordering "for free" from its
//! iteration order, with NaN scalar keys sorting last via [`FloatKey`].

use std::any::Any;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use agg_core::errors::{AggError, AggResult};
use agg_core::numeric::validate_weight;
use agg_core::primitive::{Fragment, Primitive};
use agg_core::quantity::Quantity;
use agg_core::registry::Registry;
use agg_io::value::{decode_f64, decode_f64_field, decode_opt_str_field};
use serde_json::{json, Value};

/// A wrapper around `f64` giving a total order where NaN compares equal to
/// NaN and sorts after every other value. `partial_cmp` (not bit-pattern
/// comparison) so `-0.0`/`0.0` collapse and negative values order correctly.
#[derive(Clone, Copy, Debug)]
pub struct FloatKey(pub f64);

impl PartialEq for FloatKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatKey {}

impl PartialOrd for FloatKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.0.partial_cmp(&other.0) {
            Some(ord) => ord,
            None => match (self.0.is_nan(), other.0.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => unreachable!("partial_cmp returned None for two finite floats"),
            },
        }
    }
}

/// What a `Bag`'s quantity extracts, before canonicalization into a `BagKey`.
#[derive(Clone, Debug)]
pub enum BagInput {
    Scalar(f64),
    Tuple(Vec<f64>),
    Str(String),
}

/// Canonical, `Ord`-able key stored in the bag's multiset. Variants of
/// different kinds (or tuples of different arity) are simply distinct keys;
/// nothing here enforces that one `Bag` only ever sees one kind.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum BagKey {
    Scalar(FloatKey),
    Tuple(Vec<FloatKey>),
    Str(String),
}

impl From<BagInput> for BagKey {
    fn from(v: BagInput) -> Self {
        match v {
            BagInput::Scalar(x) => BagKey::Scalar(FloatKey(x)),
            BagInput::Tuple(xs) => BagKey::Tuple(xs.into_iter().map(FloatKey).collect()),
            BagInput::Str(s) => BagKey::Str(s),
        }
    }
}

fn key_to_json(key: &BagKey) -> Value {
    match key {
        BagKey::Scalar(f) => agg_io::value::encode_f64(f.0),
        BagKey::Tuple(xs) => Value::Array(xs.iter().map(|f| agg_io::value::encode_f64(f.0)).collect()),
        BagKey::Str(s) => Value::String(s.clone()),
    }
}

fn key_from_json(v: &Value, pointer: &str) -> AggResult<BagKey> {
    match v {
        Value::String(s) => Ok(BagKey::Str(s.clone())),
        Value::Array(arr) => {
            let xs = arr
                .iter()
                .map(|e| decode_f64(e, pointer))
                .collect::<AggResult<Vec<f64>>>()?;
            Ok(BagKey::Tuple(xs.into_iter().map(FloatKey).collect()))
        }
        Value::Number(_) => Ok(BagKey::Scalar(FloatKey(decode_f64(v, pointer)?))),
        other => Err(AggError::WireFormat {
            pointer: pointer.to_string(),
            detail: format!("bag key must be a number, array, or string, got {other}"),
        }),
    }
}

/// Weighted multiset of canonicalized quantity values.
pub struct Bag<D> {
    entries: f64,
    values: BTreeMap<BagKey, f64>,
    quantity: Option<Quantity<D, BagInput>>,
    name: Option<String>,
}

/// Hand-written rather than derived: `#[derive(Debug)]` would add a
/// spurious `D: Debug` bound (the extractor closure doesn't need one — see
/// `Quantity`'s own manual impl for the same reason).
impl<D> std::fmt::Debug for Bag<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bag")
            .field("entries", &self.entries)
            .field("values", &self.values)
            .field("name", &self.name)
            .finish()
    }
}

impl<D> Bag<D> {
    pub fn new(quantity: Quantity<D, BagInput>) -> Self {
        let name = quantity.name().to_string();
        Bag {
            entries: 0.0,
            values: BTreeMap::new(),
            quantity: Some(quantity),
            name: Some(name),
        }
    }

    /// Read-only view of the accumulated multiset (value -> summed weight).
    pub fn values(&self) -> &BTreeMap<BagKey, f64> {
        &self.values
    }
}

impl<D: 'static> Primitive<D> for Bag<D> {
    fn type_name(&self) -> &'static str {
        "Bag"
    }

    fn entries(&self) -> f64 {
        self.entries
    }

    fn quantity_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn zero(&self) -> Box<dyn Primitive<D>> {
        Box::new(Bag {
            entries: 0.0,
            values: BTreeMap::new(),
            quantity: self.quantity.clone(),
            name: self.name.clone(),
        })
    }

    fn fill(&mut self, datum: &D, weight: f64) -> AggResult<()> {
        let quantity = self
            .quantity
            .as_ref()
            .ok_or(AggError::Frozen { primitive: "Bag" })?;
        validate_weight(weight)?;
        if weight <= 0.0 {
            return Ok(());
        }
        let key: BagKey = quantity.eval(datum).into();
        *self.values.entry(key).or_insert(0.0) += weight;
        self.entries += weight;
        Ok(())
    }

    fn combine(&self, other: &dyn Primitive<D>) -> AggResult<Box<dyn Primitive<D>>> {
        let other = other
            .as_any()
            .downcast_ref::<Bag<D>>()
            .ok_or(AggError::ShapeMismatch {
                left: "Bag",
                right: other.type_name(),
            })?;
        let mut values = self.values.clone();
        for (k, w) in &other.values {
            *values.entry(k.clone()).or_insert(0.0) += w;
        }
        Ok(Box::new(Bag {
            entries: self.entries + other.entries,
            values,
            quantity: self.quantity.clone(),
            name: self.name.clone(),
        }))
    }

    fn to_json_fragment(&self, suppress_name: bool) -> Fragment {
        let values: Vec<Value> = self
            .values
            .iter()
            .map(|(k, w)| json!({"w": agg_io::value::encode_f64(*w), "v": key_to_json(k)}))
            .collect();
        let mut obj = serde_json::Map::new();
        obj.insert("entries".to_string(), agg_io::value::encode_f64(self.entries));
        obj.insert("values".to_string(), Value::Array(values));
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

/// Rebuild a past-tense `Bag` from its wire fragment.
pub fn from_json_fragment<D: 'static>(
    _registry: &Registry<D>,
    fragment: &Fragment,
    name_from_parent: Option<&str>,
) -> AggResult<Box<dyn Primitive<D>>> {
    let entries = decode_f64_field(fragment, "entries")?;
    let values_json = fragment
        .get("values")
        .and_then(Value::as_array)
        .ok_or_else(|| AggError::WireFormat {
            pointer: "/values".to_string(),
            detail: "missing required array field".to_string(),
        })?;
    let mut values = BTreeMap::new();
    for (i, entry) in values_json.iter().enumerate() {
        let w = entry.get("w").ok_or_else(|| AggError::WireFormat {
            pointer: format!("/values/{i}/w"),
            detail: "missing required field".to_string(),
        })?;
        let weight = decode_f64(w, &format!("/values/{i}/w"))?;
        let v = entry.get("v").ok_or_else(|| AggError::WireFormat {
            pointer: format!("/values/{i}/v"),
            detail: "missing required field".to_string(),
        })?;
        let key = key_from_json(v, &format!("/values/{i}/v"))?;
        values.insert(key, weight);
    }
    let name = decode_opt_str_field(fragment, "name")
        .or(name_from_parent)
        .map(str::to_string);
    Ok(Box::new(Bag::<D> {
        entries,
        values,
        quantity: None,
        name,
    }))
}
