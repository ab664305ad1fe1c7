use small_db::{Database, DbIterator, SequentialScan, SmallError, Transaction};

mod common;

/// §6's operator interface, exercised end to end: register a table in
/// the global `Catalog`, insert through the global `BufferPool`, then
/// drive a `SequentialScan` over it via `open`/`has_next`/`next`, a
/// post-exhaustion `next` failing with `NoSuchElement`, and `rewind`
/// restarting the scan from the top.
#[test]
fn sequential_scan_walks_a_catalog_registered_table_and_rewinds() {
    common::setup();
    let (file, _tmp) = common::new_heap_file(2);
    let table_id = file.table_id();

    let db = Database::global();
    db.mut_catalog().add_table("scan_me", file.clone());
    assert_eq!(db.catalog().table_id("scan_me").unwrap(), table_id);
    assert_eq!(db.catalog().get_file_by_name("scan_me").unwrap().table_id(), table_id);

    let setup_tx = Transaction::new();
    for value in [10, 20, 30] {
        db.buffer_pool()
            .insert_tuple(setup_tx.id(), common::int_tuple(file.tuple_desc(), value), &file)
            .unwrap();
    }
    setup_tx.commit(&db.buffer_pool()).unwrap();

    let scan_tx = Transaction::new();
    let mut scan = SequentialScan::new(scan_tx.id(), table_id);
    scan.open().unwrap();

    let mut seen = Vec::new();
    while scan.has_next().unwrap() {
        let tuple = scan.next().unwrap();
        seen.push(tuple.get_field(0).as_int().unwrap());
    }
    seen.sort();
    assert_eq!(seen, vec![10, 20, 30]);

    assert!(!scan.has_next().unwrap());
    match scan.next() {
        Err(SmallError::NoSuchElement) => {}
        other => panic!("expected NoSuchElement, got {:?}", other.map(|_| ())),
    }

    scan.rewind().unwrap();
    let mut reseen = Vec::new();
    while scan.has_next().unwrap() {
        reseen.push(scan.next().unwrap().get_field(0).as_int().unwrap());
    }
    reseen.sort();
    assert_eq!(reseen, vec![10, 20, 30]);

    scan.close();
    scan_tx.commit(&db.buffer_pool()).unwrap();
}

#[test]
fn catalog_lookup_by_name_fails_for_an_unregistered_table() {
    common::setup();
    let db = Database::global();
    match db.catalog().table_id("no-such-table-registered-anywhere") {
        Err(SmallError::NoSuchElement) => {}
        other => panic!("expected NoSuchElement, got {:?}", other.map(|_| ())),
    }
}
