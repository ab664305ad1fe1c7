use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use small_db::{log::init_log, Field, HeapFile, Tuple, TupleDesc};
use tempfile::NamedTempFile;

static NEXT_TABLE_ID: AtomicI32 = AtomicI32::new(1);

/// Every test file in this suite runs as its own process, but `#[test]`
/// functions within one file share it; table ids must stay unique within
/// a file so two tests never collide in a shared `Database` catalog.
pub fn next_table_id() -> i32 {
    NEXT_TABLE_ID.fetch_add(1, Ordering::SeqCst)
}

/// Minimal per-test setup: start logging once, leave page size at its
/// process default (no test in this suite needs a non-default size).
pub fn setup() {
    init_log();
}

/// A fresh, empty heap file backed by a throwaway temp file, using a
/// two-`Int`-field descriptor unless the caller asks for a different
/// field count.
pub fn new_heap_file(columns: usize) -> (Arc<HeapFile>, NamedTempFile) {
    let desc = Arc::new(TupleDesc::simple_ints(columns, "f"));
    let tmp = NamedTempFile::new().expect("failed to create temp file");
    let table_id = next_table_id();
    let file = Arc::new(HeapFile::new(tmp.path(), table_id, desc).expect("failed to open heap file"));
    (file, tmp)
}

/// An `Int`-only tuple of the given width, every field set to `value`.
pub fn int_tuple(desc: &Arc<TupleDesc>, value: i64) -> Tuple {
    let fields = (0..desc.num_fields()).map(|_| Field::Int(value)).collect();
    Tuple::new(desc.clone(), fields)
}
