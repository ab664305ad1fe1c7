use std::sync::Arc;

use crate::database::Database;
use crate::error::SmallError;
use crate::heap_file::HeapFile;
use crate::lock_manager::Permission;
use crate::operator::DbIterator;
use crate::page_id::PageId;
use crate::transaction_id::TransactionId;
use crate::tuple::{Tuple, TupleDesc};

/// Walks every page of a `HeapFile` in page-number order, reading each
/// page through the shared buffer pool under `Permission::Shared`.
pub struct HeapFileIterator {
    file: Arc<HeapFile>,
    tid: TransactionId,
    page_number: usize,
    buffered: Vec<Tuple>,
    buffer_pos: usize,
    opened: bool,
}

impl HeapFileIterator {
    pub fn new(file: Arc<HeapFile>, tid: TransactionId) -> Self {
        Self {
            file,
            tid,
            page_number: 0,
            buffered: Vec::new(),
            buffer_pos: 0,
            opened: false,
        }
    }

    fn load_page(&mut self, page_number: usize) -> Result<(), SmallError> {
        let pid = PageId::new(self.file.table_id(), page_number);
        let page = Database::global()
            .buffer_pool()
            .get_page(self.tid, pid, Permission::Shared, &self.file)?;
        self.buffered = page.tuples();
        self.buffer_pos = 0;
        Ok(())
    }

    /// Advances past exhausted pages until a tuple is available or the
    /// file is exhausted.
    fn advance_to_next_tuple(&mut self) -> Result<(), SmallError> {
        while self.buffer_pos >= self.buffered.len() {
            self.page_number += 1;
            if self.page_number >= self.file.num_pages() {
                self.buffered.clear();
                self.buffer_pos = 0;
                return Ok(());
            }
            self.load_page(self.page_number)?;
        }
        Ok(())
    }
}

impl DbIterator for HeapFileIterator {
    fn open(&mut self) -> Result<(), SmallError> {
        self.page_number = 0;
        if self.file.num_pages() > 0 {
            self.load_page(0)?;
            self.advance_to_next_tuple()?;
        } else {
            self.buffered.clear();
            self.buffer_pos = 0;
        }
        self.opened = true;
        Ok(())
    }

    fn has_next(&mut self) -> Result<bool, SmallError> {
        if !self.opened {
            return Ok(false);
        }
        Ok(self.buffer_pos < self.buffered.len())
    }

    fn next(&mut self) -> Result<Tuple, SmallError> {
        if !self.has_next()? {
            return Err(SmallError::NoSuchElement);
        }
        let tuple = self.buffered[self.buffer_pos].clone();
        self.buffer_pos += 1;
        self.advance_to_next_tuple()?;
        Ok(tuple)
    }

    fn rewind(&mut self) -> Result<(), SmallError> {
        self.open()
    }

    fn close(&mut self) {
        self.opened = false;
        self.buffered.clear();
        self.buffer_pos = 0;
    }

    fn tuple_desc(&self) -> &TupleDesc {
        self.file.tuple_desc()
    }
}
