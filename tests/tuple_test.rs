use std::sync::Arc;

use small_db::{Field, Tuple, TupleDesc, Type};

mod common;

#[test]
fn equality_ignores_field_names() {
    common::setup();
    let a = TupleDesc::simple_ints(2, "a");
    let b = TupleDesc::simple_ints(2, "b");
    assert_eq!(a, b);
}

#[test]
fn equality_is_sensitive_to_types_and_width() {
    common::setup();
    let ints = TupleDesc::simple_ints(2, "f");
    let one_int = TupleDesc::simple_ints(1, "f");
    assert_ne!(ints, one_int);

    let mixed = TupleDesc::new(vec![(Type::Int, None), (Type::Varchar, None)]);
    assert_ne!(ints, mixed);
}

#[test]
fn merge_concatenates_field_counts() {
    common::setup();
    let left = TupleDesc::simple_ints(2, "l");
    let right = TupleDesc::simple_ints(3, "r");
    let merged = TupleDesc::merge(&left, &right);
    assert_eq!(merged.num_fields(), left.num_fields() + right.num_fields());
    assert_eq!(merged.field_type(0), Type::Int);
    assert_eq!(merged.field_type(4), Type::Int);
}

#[test]
fn index_of_finds_the_first_matching_name() {
    common::setup();
    let desc = TupleDesc::simple_ints(3, "f");
    assert_eq!(desc.index_of("f-1"), Some(1));
    assert_eq!(desc.index_of("nope"), None);
}

#[test]
fn int_tuple_round_trips_through_serialize() {
    common::setup();
    let desc = Arc::new(TupleDesc::simple_ints(3, "f"));
    let tuple = Tuple::new(desc.clone(), vec![Field::Int(1), Field::Int(-2), Field::Int(3)]);

    let bytes = tuple.serialize();
    let back = Tuple::deserialize(desc, &bytes);
    for i in 0..3 {
        assert_eq!(back.get_field(i), tuple.get_field(i));
    }
}

#[test]
fn varchar_tuple_round_trips_through_serialize() {
    common::setup();
    let desc = Arc::new(TupleDesc::new(vec![
        (Type::Int, Some("id".to_string())),
        (Type::Varchar, Some("name".to_string())),
    ]));
    let tuple = Tuple::new(desc.clone(), vec![Field::Int(7), Field::Varchar("hello".to_string())]);

    let bytes = tuple.serialize();
    let back = Tuple::deserialize(desc, &bytes);
    assert_eq!(back.get_field(0), &Field::Int(7));
    assert_eq!(back.get_field(1), &Field::Varchar("hello".to_string()));
}

#[test]
fn fresh_tuple_has_no_record_id_until_assigned() {
    common::setup();
    let desc = Arc::new(TupleDesc::simple_ints(1, "f"));
    let tuple = Tuple::new(desc, vec![Field::Int(1)]);
    assert!(tuple.record_id().is_none());

    let (file, _tmp) = common::new_heap_file(1);
    let bp = small_db::BufferPool::new(10);
    let tid = small_db::Transaction::new().id();
    let page = file.insert_tuple(tid, tuple, &bp).unwrap();
    let inserted = page.tuples().into_iter().next().unwrap();
    assert!(inserted.record_id().is_some());
}
