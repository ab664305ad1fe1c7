use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use log::debug;

use crate::buffer_pool::BufferPool;
use crate::config::page_size;
use crate::error::SmallError;
use crate::lock_manager::Permission;
use crate::page::HeapPage;
use crate::page_id::PageId;
use crate::transaction_id::TransactionId;
use crate::tuple::{Tuple, TupleDesc};

/// Per-table random-access container of fixed-size pages: a contiguous
/// sequence of pages in a single backing file.
#[derive(Debug)]
pub struct HeapFile {
    table_id: i32,
    file: Mutex<File>,
    tuple_desc: Arc<TupleDesc>,
}

impl HeapFile {
    pub fn new(path: &Path, table_id: i32, tuple_desc: Arc<TupleDesc>) -> Result<Self, SmallError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;
        Ok(Self {
            table_id,
            file: Mutex::new(file),
            tuple_desc,
        })
    }

    pub fn table_id(&self) -> i32 {
        self.table_id
    }

    pub fn tuple_desc(&self) -> &Arc<TupleDesc> {
        &self.tuple_desc
    }

    /// `fileLength / pageSize`, integer division; fractional trailing
    /// bytes are ignored.
    pub fn num_pages(&self) -> usize {
        let file = self.file.lock().unwrap();
        let len = file.metadata().map(|m| m.len()).unwrap_or(0);
        (len as usize) / page_size()
    }

    /// Reads exactly one page's worth of bytes at `pid`'s offset. Fails
    /// with `InvalidPage` if `pid.page_number` is at or past the current
    /// page count.
    pub fn read_page(&self, pid: PageId) -> Result<HeapPage, SmallError> {
        if pid.table_id != self.table_id || pid.page_number >= self.num_pages() {
            return Err(SmallError::InvalidPage(pid));
        }

        let page_size = page_size();
        let mut file = self.file.lock().unwrap();
        file.seek(SeekFrom::Start((pid.page_number * page_size) as u64))?;
        let mut buf = vec![0u8; page_size];
        if let Err(e) = file.read_exact(&mut buf) {
            log::error!("failed to read page {:?}: {}", pid, e);
            return Err(SmallError::InvalidPage(pid));
        }
        debug!("read page {:?} from disk", pid);
        Ok(HeapPage::from_bytes(pid, self.tuple_desc.clone(), buf))
    }

    /// Seeks to the page's offset and writes its byte image.
    pub fn write_page(&self, page: &HeapPage) -> Result<(), SmallError> {
        let page_size = page_size();
        let mut file = self.file.lock().unwrap();
        file.seek(SeekFrom::Start(
            (page.page_id().page_number * page_size) as u64,
        ))?;
        file.write_all(&page.page_data())?;
        file.flush()?;
        Ok(())
    }

    /// Appends a fresh zero-initialized page, extending the file by
    /// `pageSize` zero bytes, and returns its PageId.
    fn append_empty_page(&self) -> Result<PageId, SmallError> {
        let page_size = page_size();
        let mut file = self.file.lock().unwrap();
        let len = file.metadata()?.len();
        let page_number = (len as usize) / page_size;
        file.seek(SeekFrom::End(0))?;
        file.write_all(&vec![0u8; page_size])?;
        file.flush()?;
        Ok(PageId::new(self.table_id, page_number))
    }

    /// Scans pages 0..num_pages in order, acquiring each through the
    /// buffer pool with exclusive permission, and inserts into the first
    /// page with an empty slot. If none is found, appends a fresh page
    /// and inserts into that. Returns the single modified page.
    pub fn insert_tuple(
        self: &Arc<Self>,
        tid: TransactionId,
        tuple: Tuple,
        bp: &BufferPool,
    ) -> Result<HeapPage, SmallError> {
        if tuple.tuple_desc().as_ref() != self.tuple_desc.as_ref() {
            return Err(SmallError::DbException(
                "tuple descriptor does not match table's descriptor".to_string(),
            ));
        }

        let existing_pages = self.num_pages();
        for page_number in 0..existing_pages {
            let pid = PageId::new(self.table_id, page_number);
            let mut page = bp.get_page(tid, pid, Permission::Exclusive, self)?;
            match page.insert_tuple(tuple.clone()) {
                Ok(_) => return Ok(page),
                Err(_) => continue, // page is full, try the next one
            }
        }

        let pid = self.append_empty_page()?;
        let mut page = bp.get_page(tid, pid, Permission::Exclusive, self)?;
        page.insert_tuple(tuple)?;
        Ok(page)
    }

    /// Looks up the owning page via the tuple's record id, acquires it
    /// exclusively, and removes the tuple. Returns the modified page.
    pub fn delete_tuple(
        self: &Arc<Self>,
        tid: TransactionId,
        tuple: &Tuple,
        bp: &BufferPool,
    ) -> Result<HeapPage, SmallError> {
        let record_id = tuple.record_id().ok_or_else(|| {
            SmallError::DbException("tuple has no record id to delete by".to_string())
        })?;
        if record_id.page_id.table_id != self.table_id {
            return Err(SmallError::DbException(
                "record id belongs to a different table".to_string(),
            ));
        }

        let mut page = bp.get_page(tid, record_id.page_id, Permission::Exclusive, self)?;
        page.delete_tuple(record_id)?;
        Ok(page)
    }
}
