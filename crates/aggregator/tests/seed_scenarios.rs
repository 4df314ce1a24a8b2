//! Literal seed-scenario table covering each primitive, plus the
//! zero/one/two-fill round-trip checks for each expression.

use aggregator::prelude::*;

const TOL: Tolerance = Tolerance::DEFAULT;

#[test]
fn deviate_over_one_to_four() {
    let mut dev: Deviate<f64> = Deviate::new(Quantity::new("x", |d: &f64| *d));
    for d in [1.0, 2.0, 3.0, 4.0] {
        dev.fill(&d, 1.0).unwrap();
    }
    assert_eq!(dev.entries(), 4.0);
    assert!(numeq(dev.mean(), 2.5, TOL));
}

#[test]
fn deviate_with_nan_in_stream() {
    let mut dev: Deviate<f64> = Deviate::new(Quantity::new("x", |d: &f64| *d));
    for d in [1.0, f64::NAN] {
        dev.fill(&d, 1.0).unwrap();
    }
    assert_eq!(dev.entries(), 2.0);
    assert!(dev.mean().is_nan());
}

#[test]
fn bag_over_strings() {
    let mut bag: Bag<&str> = Bag::new(Quantity::new("x", |d: &&str| BagInput::Str(d.to_string())));
    for d in ["a", "b", "a"] {
        bag.fill(&d, 1.0).unwrap();
    }
    assert_eq!(bag.entries(), 3.0);
    assert_eq!(bag.values().get(&BagKey::Str("a".into())), Some(&2.0));
    assert_eq!(bag.values().get(&BagKey::Str("b".into())), Some(&1.0));
}

#[test]
fn fraction_of_positive_values() {
    let selector = Quantity::from_predicate("positive", |d: &f64| *d > 0.0);
    let mut fraction: Fraction<f64> = Fraction::new(selector, Box::new(Count::<f64>::new()));
    for d in [-1.0, 0.0, 1.0, 2.0] {
        fraction.fill(&d, 1.0).unwrap();
    }
    assert_eq!(fraction.entries(), 4.0);
    assert_eq!(fraction.numerator().entries(), 2.0);
    assert_eq!(fraction.denominator().entries(), 4.0);
}

#[test]
fn select_weighted_by_raw_value() {
    let selector = Quantity::new("x", |d: &f64| *d);
    let mut select: Select<f64> = Select::new(selector, Box::new(Count::<f64>::new()));
    for d in [0.0, 2.0, 3.0] {
        select.fill(&d, 1.0).unwrap();
    }
    assert_eq!(select.entries(), 3.0);
    assert_eq!(select.cut().entries(), 5.0);
}

#[test]
fn deviate_combine_of_two_partitions() {
    let mut a: Deviate<f64> = Deviate::new(Quantity::new("x", |d: &f64| *d));
    let mut b: Deviate<f64> = Deviate::new(Quantity::new("x", |d: &f64| *d));
    for d in [1.0, 2.0] {
        a.fill(&d, 1.0).unwrap();
    }
    for d in [3.0, 4.0] {
        b.fill(&d, 1.0).unwrap();
    }
    let combined = a.combine(&b).unwrap();
    let combined = combined.as_any().downcast_ref::<Deviate<f64>>().unwrap();
    assert_eq!(combined.entries(), 4.0);
    assert!(numeq(combined.mean(), 2.5, TOL));
    assert!(numeq(combined.variance(), 1.25, TOL));
}

#[test]
fn zero_fill_twice_round_trips_through_registry() {
    let registry: agg_core::Registry<f64> = builtin_registry();

    let mut dev: Deviate<f64> = Deviate::new(Quantity::new("x", |d: &f64| *d));
    let zero_doc = dump(&dev);
    assert_eq!(zero_doc.type_name, "Deviate");

    for d in [1.0, 2.0, 3.0, 4.0] {
        dev.fill(&d, 1.0).unwrap();
    }
    let one_doc = dump(&dev);
    let rebuilt = load(&registry, &one_doc).unwrap();
    assert_eq!(rebuilt.entries(), dev.entries());

    let two = dev.combine(&dev).unwrap();
    let two_doc = dump(two.as_ref());
    let rebuilt_two = load(&registry, &two_doc).unwrap();
    assert_eq!(rebuilt_two.entries(), 8.0);

    let zero_again = dev.zero();
    assert_eq!(dump(zero_again.as_ref()).data, zero_doc.data);
}
