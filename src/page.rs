use std::sync::Arc;

use bit_vec::BitVec;
use log::debug;

use crate::error::SmallError;
use crate::page_id::{PageId, RecordId};
use crate::transaction_id::TransactionId;
use crate::tuple::{Tuple, TupleDesc};

/// Number of slots a page of `page_size` bytes can hold for tuples of the
/// given descriptor, under the classic bitmap-header-plus-slot-array
/// layout: `num_slots = floor((page_size * 8) / (tuple_size * 8 + 1))`
/// (one extra header bit per slot).
pub fn num_slots(tuple_desc: &TupleDesc, page_size: usize) -> usize {
    let tuple_bits = tuple_desc.byte_size() * 8;
    (page_size * 8) / (tuple_bits + 1)
}

/// `header_bytes = ceil(num_slots / 8)`.
pub fn header_size(slots: usize) -> usize {
    (slots + 7) / 8
}

/// A fixed-size in-memory page image: a slotted array of tuples preceded
/// by a bitmap header, plus the cache metadata (PageId, dirty flag, and
/// the transaction that dirtied it). The header is a `BitVec`, one bit
/// per slot (MSB-first within its byte), mirroring the occupancy bitmap
/// every page kind in this example pack carries.
#[derive(Debug, Clone)]
pub struct HeapPage {
    page_id: PageId,
    tuple_desc: Arc<TupleDesc>,
    num_slots: usize,
    header_size: usize,
    tuple_size: usize,
    header: BitVec<u32>,
    /// Everything past the header: the slot array plus whatever trailing
    /// padding bytes the page size leaves over. Kept verbatim so a
    /// read-then-write round-trip reproduces the exact on-disk image.
    body: Vec<u8>,
    dirty: Option<TransactionId>,
}

impl HeapPage {
    /// Constructs a page from its on-disk byte image. `bytes.len()` must
    /// equal the process-wide page size.
    pub fn from_bytes(page_id: PageId, tuple_desc: Arc<TupleDesc>, bytes: Vec<u8>) -> HeapPage {
        let page_size = bytes.len();
        let slots = num_slots(&tuple_desc, page_size);
        let header_size = header_size(slots);
        let tuple_size = tuple_desc.byte_size();
        debug!(
            "loaded page {:?}: {} slots, {} byte header",
            page_id, slots, header_size
        );
        HeapPage {
            page_id,
            tuple_desc,
            num_slots: slots,
            header_size,
            tuple_size,
            header: BitVec::from_bytes(&bytes[..header_size]),
            body: bytes[header_size..].to_vec(),
            dirty: None,
        }
    }

    /// A fresh, all-empty page of the given size (used when the heap file
    /// grows by one page).
    pub fn empty(page_id: PageId, tuple_desc: Arc<TupleDesc>, page_size: usize) -> HeapPage {
        HeapPage::from_bytes(page_id, tuple_desc, vec![0u8; page_size])
    }

    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    pub fn tuple_desc(&self) -> &Arc<TupleDesc> {
        &self.tuple_desc
    }

    pub fn num_slots(&self) -> usize {
        self.num_slots
    }

    pub fn is_dirty(&self) -> Option<TransactionId> {
        self.dirty
    }

    pub fn mark_dirty(&mut self, dirty: bool, tid: Option<TransactionId>) {
        self.dirty = if dirty { tid } else { None };
    }

    /// The page's byte image, as written to or read from disk: the header
    /// bitmap followed by the slot array and any trailing padding.
    pub fn page_data(&self) -> Vec<u8> {
        let mut out = self.header.to_bytes();
        out.extend_from_slice(&self.body);
        out
    }

    fn is_used(&self, slot: usize) -> bool {
        self.header.get(slot).unwrap_or(false)
    }

    fn slot_range(&self, slot: usize) -> std::ops::Range<usize> {
        let start = slot * self.tuple_size;
        start..start + self.tuple_size
    }

    /// All occupied tuples in slot order, each carrying its `RecordId`.
    pub fn tuples(&self) -> Vec<Tuple> {
        let mut out = Vec::new();
        for slot in 0..self.num_slots {
            if self.is_used(slot) {
                let range = self.slot_range(slot);
                let mut tuple = Tuple::deserialize(self.tuple_desc.clone(), &self.body[range]);
                tuple.set_record_id(RecordId::new(self.page_id, slot));
                out.push(tuple);
            }
        }
        out
    }

    /// Finds the first empty slot and writes `tuple` into it, returning the
    /// slot the tuple now occupies. `None` if the page is full.
    pub fn insert_tuple(&mut self, mut tuple: Tuple) -> Result<Tuple, SmallError> {
        if tuple.tuple_desc().as_ref() != self.tuple_desc.as_ref() {
            return Err(SmallError::DbException(
                "tuple descriptor does not match page's table".to_string(),
            ));
        }
        let slot = (0..self.num_slots)
            .find(|&s| !self.is_used(s))
            .ok_or_else(|| SmallError::DbException("page has no empty slot".to_string()))?;

        let bytes = tuple.serialize();
        let range = self.slot_range(slot);
        self.body[range].copy_from_slice(&bytes);
        self.header.set(slot, true);

        let record_id = RecordId::new(self.page_id, slot);
        tuple.set_record_id(record_id);
        Ok(tuple)
    }

    /// Removes the tuple occupying `record_id`'s slot.
    pub fn delete_tuple(&mut self, record_id: RecordId) -> Result<(), SmallError> {
        if record_id.page_id != self.page_id {
            return Err(SmallError::DbException(
                "tuple does not belong to this page".to_string(),
            ));
        }
        let slot = record_id.slot_number;
        if slot >= self.num_slots || !self.is_used(slot) {
            return Err(SmallError::DbException(
                "tuple slot is not occupied".to_string(),
            ));
        }
        let range = self.slot_range(slot);
        self.body[range].fill(0);
        self.header.set(slot, false);
        Ok(())
    }
}
