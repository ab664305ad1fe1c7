use thiserror::Error;

use crate::page_id::PageId;

/// The error taxonomy for the whole storage core. Every fallible public
/// operation returns `Result<T, SmallError>`.
#[derive(Error, Debug)]
pub enum SmallError {
    /// A page identifier was out of range for its file.
    #[error("invalid page: {0:?}")]
    InvalidPage(PageId),

    /// A structural or capacity failure, e.g. no clean page to evict, or a
    /// tuple descriptor mismatch on insert.
    #[error("db exception: {0}")]
    DbException(String),

    /// Raised by the deadlock detector, or by a thread interrupted while
    /// suspended in `get_page`. The caller must run abort cleanup.
    #[error("transaction aborted")]
    TransactionAborted,

    /// An iterator was advanced past exhaustion, or a lookup by name missed.
    #[error("no such element")]
    NoSuchElement,

    /// Underlying file I/O failure.
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type SmallResult = Result<(), SmallError>;
