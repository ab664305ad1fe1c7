//! Page-granularity transactional storage core: a fixed-size buffer
//! pool, two-phase-locked heap files, and deadlock detection via a
//! waits-for graph, under a no-steal/force commit policy.

pub mod aggregator;
pub mod buffer_pool;
pub mod catalog;
pub mod config;
pub mod database;
pub mod error;
pub mod field;
pub mod heap_file;
pub mod heap_file_iterator;
pub mod histogram;
pub mod lock_manager;
pub mod log;
pub mod operator;
pub mod page;
pub mod page_id;
pub mod predicate;
pub mod sequential_scan;
pub mod transaction;
pub mod transaction_id;
pub mod tuple;
pub mod wait_for_graph;

pub use aggregator::{AggOp, Aggregator, IntegerAggregator, StringAggregator};
pub use buffer_pool::BufferPool;
pub use catalog::Catalog;
pub use database::Database;
pub use error::{SmallError, SmallResult};
pub use field::{Field, Type};
pub use heap_file::HeapFile;
pub use heap_file_iterator::HeapFileIterator;
pub use histogram::IntHistogram;
pub use lock_manager::{LockManager, Permission};
pub use operator::DbIterator;
pub use page::HeapPage;
pub use page_id::{PageId, RecordId};
pub use predicate::{Op, Predicate};
pub use sequential_scan::SequentialScan;
pub use transaction::Transaction;
pub use transaction_id::TransactionId;
pub use tuple::{Tuple, TupleDesc};
pub use wait_for_graph::WaitForGraph;
