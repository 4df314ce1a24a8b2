//! Property tests for the algebraic invariants shared by every primitive:
//! zero-identity, commutativity, associativity, fill/combine equivalence,
//! entries monotonicity, Bag mass, and Deviate NaN poisoning.

use agg_algo::primitives::{Bag, BagInput, Count, Deviate, Fraction, Select};
use agg_core::numeric::{numeq, Tolerance};
use agg_core::primitive::Primitive;
use agg_core::quantity::Quantity;
use proptest::prelude::*;

const TOL: Tolerance = Tolerance::DEFAULT;

fn finite() -> impl Strategy<Value = f64> {
    -1000.0f64..1000.0f64
}

fn deviate_filled(data: &[f64]) -> Deviate<f64> {
    let mut dev: Deviate<f64> = Deviate::new(Quantity::new("x", |d: &f64| *d));
    for d in data {
        dev.fill(d, 1.0).unwrap();
    }
    dev
}

fn deviate_snapshot(p: &dyn Primitive<f64>) -> (f64, f64, f64) {
    let d = p.as_any().downcast_ref::<Deviate<f64>>().unwrap();
    (d.entries(), d.mean(), d.variance())
}

proptest! {
    #[test]
    fn deviate_zero_is_identity(data in prop::collection::vec(finite(), 0..20)) {
        let dev = deviate_filled(&data);
        let zero = dev.zero();
        let combined = dev.combine(zero.as_ref()).unwrap();
        let (e1, m1, v1) = deviate_snapshot(&dev);
        let (e2, m2, v2) = deviate_snapshot(combined.as_ref());
        prop_assert!(numeq(e1, e2, TOL));
        prop_assert!(numeq(m1, m2, TOL));
        prop_assert!(numeq(v1, v2, TOL));
    }

    #[test]
    fn deviate_combine_is_commutative(a in prop::collection::vec(finite(), 0..15), b in prop::collection::vec(finite(), 0..15)) {
        let da = deviate_filled(&a);
        let db = deviate_filled(&b);
        let ab = da.combine(&db).unwrap();
        let ba = db.combine(&da).unwrap();
        let (e1, m1, v1) = deviate_snapshot(ab.as_ref());
        let (e2, m2, v2) = deviate_snapshot(ba.as_ref());
        prop_assert!(numeq(e1, e2, TOL));
        prop_assert!(numeq(m1, m2, TOL));
        prop_assert!(numeq(v1, v2, TOL));
    }

    #[test]
    fn deviate_combine_is_associative(
        a in prop::collection::vec(finite(), 0..10),
        b in prop::collection::vec(finite(), 0..10),
        c in prop::collection::vec(finite(), 0..10),
    ) {
        let da = deviate_filled(&a);
        let db = deviate_filled(&b);
        let dc = deviate_filled(&c);
        let left = da.combine(&db).unwrap().combine(dc.as_ref()).unwrap();
        let right = da.combine(db.combine(&dc).unwrap().as_ref()).unwrap();
        let (e1, m1, v1) = deviate_snapshot(left.as_ref());
        let (e2, m2, v2) = deviate_snapshot(right.as_ref());
        prop_assert!(numeq(e1, e2, TOL));
        prop_assert!(numeq(m1, m2, TOL));
        prop_assert!(numeq(v1, v2, TOL));
    }

    #[test]
    fn deviate_fill_matches_combine_of_singletons(data in prop::collection::vec(finite(), 1..15)) {
        let sequential = deviate_filled(&data);
        let mut acc: Box<dyn Primitive<f64>> = Box::new(Deviate::<f64>::new(Quantity::new("x", |d: &f64| *d)));
        for d in &data {
            let singleton = deviate_filled(std::slice::from_ref(d));
            acc = acc.combine(&singleton).unwrap();
        }
        let (e1, m1, v1) = deviate_snapshot(&sequential);
        let (e2, m2, v2) = deviate_snapshot(acc.as_ref());
        prop_assert!(numeq(e1, e2, TOL));
        prop_assert!(numeq(m1, m2, TOL));
        prop_assert!(numeq(v1, v2, TOL));
    }

    #[test]
    fn deviate_entries_are_monotone(data in prop::collection::vec(finite(), 0..20), w in 0.0f64..10.0) {
        let mut dev: Deviate<f64> = Deviate::new(Quantity::new("x", |d: &f64| *d));
        let mut expected = 0.0;
        for d in &data {
            dev.fill(d, w).unwrap();
            expected += w;
            prop_assert!(numeq(dev.entries(), expected, TOL));
        }
    }

    #[test]
    fn deviate_nan_poisons_subsequent_finite_fills(before in prop::collection::vec(finite(), 0..5), after in prop::collection::vec(finite(), 0..5)) {
        let mut dev: Deviate<f64> = Deviate::new(Quantity::new("x", |d: &f64| *d));
        for d in &before {
            dev.fill(d, 1.0).unwrap();
        }
        dev.fill(&f64::NAN, 1.0).unwrap();
        prop_assert!(dev.mean().is_nan());
        prop_assert!(dev.variance().is_nan());
        for d in &after {
            dev.fill(d, 1.0).unwrap();
            prop_assert!(dev.mean().is_nan());
            prop_assert!(dev.variance().is_nan());
        }
    }

    #[test]
    fn bag_mass_equals_entries(data in prop::collection::vec(finite(), 0..30)) {
        let mut bag: Bag<f64> = Bag::new(Quantity::new("x", |d: &f64| BagInput::Scalar(*d)));
        for d in &data {
            bag.fill(d, 1.0).unwrap();
        }
        let mass: f64 = bag.values().values().sum();
        prop_assert!(numeq(mass, bag.entries(), TOL));
    }

    #[test]
    fn bag_zero_is_identity(data in prop::collection::vec(finite(), 0..20)) {
        let mut bag: Bag<f64> = Bag::new(Quantity::new("x", |d: &f64| BagInput::Scalar(*d)));
        for d in &data {
            bag.fill(d, 1.0).unwrap();
        }
        let zero = bag.zero();
        let combined = bag.combine(zero.as_ref()).unwrap();
        prop_assert!(numeq(combined.entries(), bag.entries(), TOL));
    }

    #[test]
    fn fraction_children_never_exceed_total(data in prop::collection::vec(finite(), 0..30)) {
        let selector = Quantity::from_predicate("positive", |d: &f64| *d > 0.0);
        let mut fraction: Fraction<f64> = Fraction::new(selector, Box::new(Count::<f64>::new()));
        for d in &data {
            fraction.fill(d, 1.0).unwrap();
        }
        prop_assert!(fraction.numerator().entries() <= fraction.denominator().entries());
        prop_assert_eq!(fraction.denominator().entries(), fraction.entries());
    }

    #[test]
    fn select_cut_never_exceeds_total_for_boolean_selector(data in prop::collection::vec(finite(), 0..30)) {
        // This invariant assumes a boolean-coercing selector (w in {0, weight});
        // a raw-magnitude selector (e.g. `Select(x -> x, Count)`) is a
        // deliberately exempted non-clamping case, not covered here.
        let selector = Quantity::from_predicate("positive", |d: &f64| *d > 0.0);
        let mut select: Select<f64> = Select::new(selector, Box::new(Count::<f64>::new()));
        for d in &data {
            select.fill(d, 1.0).unwrap();
        }
        prop_assert!(select.cut().entries() <= select.entries());
    }
}
