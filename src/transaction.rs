use std::fmt;

use crate::buffer_pool::BufferPool;
use crate::error::SmallError;
use crate::transaction_id::TransactionId;

/// Client-facing handle on a transaction. Holds nothing but its id; all
/// state (locks held, pages dirtied) lives in the buffer pool, keyed by
/// that id. `commit`/`abort` take the same `BufferPool` reference the
/// caller used for this transaction's `get_page`/`insert_tuple` calls,
/// the same explicit-pool discipline those calls themselves follow,
/// rather than reaching for a process-wide singleton that may not be
/// the pool the caller actually transacted against.
#[derive(Clone, Copy)]
pub struct Transaction {
    id: TransactionId,
}

impl Transaction {
    pub fn new() -> Self {
        Self {
            id: TransactionId::new(),
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Flushes every page this transaction dirtied in `bp` and releases
    /// its locks there.
    pub fn commit(&self, bp: &BufferPool) -> Result<(), SmallError> {
        bp.transaction_complete(self.id, true)
    }

    /// Rolls back every page this transaction touched in `bp` and
    /// releases its locks there.
    pub fn abort(&self, bp: &BufferPool) -> Result<(), SmallError> {
        bp.transaction_complete(self.id, false)
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
