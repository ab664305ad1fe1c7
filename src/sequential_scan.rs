use crate::database::Database;
use crate::error::SmallError;
use crate::heap_file_iterator::HeapFileIterator;
use crate::operator::DbIterator;
use crate::transaction_id::TransactionId;
use crate::tuple::{Tuple, TupleDesc};

/// Full scan of one table, by table id. Thin adapter from a table id to
/// the `HeapFile` it names, handed off to `HeapFileIterator`.
pub struct SequentialScan {
    tid: TransactionId,
    table_id: i32,
    inner: Option<HeapFileIterator>,
}

impl SequentialScan {
    pub fn new(tid: TransactionId, table_id: i32) -> Self {
        Self {
            tid,
            table_id,
            inner: None,
        }
    }
}

impl DbIterator for SequentialScan {
    fn open(&mut self) -> Result<(), SmallError> {
        let file = Database::global().catalog().get_file(self.table_id)?;
        let mut iter = HeapFileIterator::new(file, self.tid);
        iter.open()?;
        self.inner = Some(iter);
        Ok(())
    }

    fn has_next(&mut self) -> Result<bool, SmallError> {
        match &mut self.inner {
            Some(iter) => iter.has_next(),
            None => Ok(false),
        }
    }

    fn next(&mut self) -> Result<Tuple, SmallError> {
        match &mut self.inner {
            Some(iter) => iter.next(),
            None => Err(SmallError::NoSuchElement),
        }
    }

    fn rewind(&mut self) -> Result<(), SmallError> {
        match &mut self.inner {
            Some(iter) => iter.rewind(),
            None => self.open(),
        }
    }

    fn close(&mut self) {
        if let Some(iter) = &mut self.inner {
            iter.close();
        }
        self.inner = None;
    }

    fn tuple_desc(&self) -> &TupleDesc {
        self.inner
            .as_ref()
            .expect("tuple_desc called before open")
            .tuple_desc()
    }
}
