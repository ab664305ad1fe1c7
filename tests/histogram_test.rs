use small_db::{IntHistogram, Op};

mod common;

fn populated(min: i64, max: i64) -> IntHistogram {
    let mut h = IntHistogram::new(10, min, max);
    for v in min..=max {
        h.add_value(v);
    }
    h
}

#[test]
fn equals_and_not_equals_are_complementary() {
    common::setup();
    let h = populated(0, 99);
    for v in [0, 17, 50, 99] {
        let eq = h.estimate_selectivity(Op::Equals, v);
        let neq = h.estimate_selectivity(Op::NotEquals, v);
        assert!((eq + neq - 1.0).abs() < 1e-9, "v={} eq={} neq={}", v, eq, neq);
    }
}

#[test]
fn less_equal_and_greater_partition_the_whole_range() {
    common::setup();
    let h = populated(0, 99);
    for v in [0, 17, 50, 99] {
        let lt = h.estimate_selectivity(Op::LessThan, v);
        let eq = h.estimate_selectivity(Op::Equals, v);
        let gt = h.estimate_selectivity(Op::GreaterThan, v);
        let total = lt + eq + gt;
        assert!((total - 1.0).abs() < 1e-9, "v={} total={}", v, total);
    }
}

#[test]
fn greater_or_eq_is_the_complement_of_less_than() {
    common::setup();
    let h = populated(0, 99);
    for v in [0, 40, 99] {
        let ge = h.estimate_selectivity(Op::GreaterThanOrEq, v);
        let lt = h.estimate_selectivity(Op::LessThan, v);
        assert!((ge + lt - 1.0).abs() < 1e-9);
    }
}

#[test]
fn less_or_eq_is_the_complement_of_greater_than() {
    common::setup();
    let h = populated(0, 99);
    for v in [0, 40, 99] {
        let le = h.estimate_selectivity(Op::LessThanOrEq, v);
        let gt = h.estimate_selectivity(Op::GreaterThan, v);
        assert!((le + gt - 1.0).abs() < 1e-9);
    }
}

#[test]
fn values_outside_the_range_never_match_equals() {
    common::setup();
    let h = populated(10, 20);
    assert_eq!(h.estimate_selectivity(Op::Equals, 0), 0.0);
    assert_eq!(h.estimate_selectivity(Op::Equals, 1000), 0.0);
}

#[test]
fn greater_than_the_max_is_always_false() {
    common::setup();
    let h = populated(0, 9);
    assert_eq!(h.estimate_selectivity(Op::GreaterThan, 9), 0.0);
}

#[test]
fn less_than_the_min_is_always_false() {
    common::setup();
    let h = populated(0, 9);
    assert_eq!(h.estimate_selectivity(Op::LessThan, 0), 0.0);
}

#[test]
fn a_single_repeated_value_concentrates_all_mass_in_its_bucket() {
    common::setup();
    let mut h = IntHistogram::new(5, 0, 99);
    for _ in 0..50 {
        h.add_value(42);
    }
    let eq = h.estimate_selectivity(Op::Equals, 42);
    assert!(eq > 0.0);
    let eq_elsewhere = h.estimate_selectivity(Op::Equals, 0);
    assert!(eq_elsewhere < eq);
}
