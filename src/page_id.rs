/// Coordinate identifying a page within the whole database: which table,
/// and which page number within that table's heap file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId {
    pub table_id: i32,
    pub page_number: usize,
}

impl PageId {
    pub fn new(table_id: i32, page_number: usize) -> Self {
        Self {
            table_id,
            page_number,
        }
    }
}

/// (PageId, slot number) coordinate identifying a tuple's storage slot.
/// A `Tuple` acquires a `RecordId` when it is read from, or inserted into,
/// a page; `delete_tuple` uses it to find the owning page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId {
    pub page_id: PageId,
    pub slot_number: usize,
}

impl RecordId {
    pub fn new(page_id: PageId, slot_number: usize) -> Self {
        Self {
            page_id,
            slot_number,
        }
    }
}
