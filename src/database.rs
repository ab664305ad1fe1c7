use std::sync::RwLock;

use once_cell::sync::OnceCell;

use crate::buffer_pool::BufferPool;
use crate::catalog::Catalog;
use crate::config::DEFAULT_BUFFER_POOL_PAGES;

/// Process-wide handle onto the catalog and the buffer pool. A single
/// instance is lazily constructed behind a `OnceCell` the first time
/// `Database::global` is called; there is no way to reach either piece
/// of state except through it.
pub struct Database {
    catalog: RwLock<Catalog>,
    buffer_pool: RwLock<BufferPool>,
}

static INSTANCE: OnceCell<Database> = OnceCell::new();

impl Database {
    fn new() -> Self {
        Self {
            catalog: RwLock::new(Catalog::new()),
            buffer_pool: RwLock::new(BufferPool::new(DEFAULT_BUFFER_POOL_PAGES)),
        }
    }

    pub fn global() -> &'static Database {
        INSTANCE.get_or_init(Database::new)
    }

    pub fn catalog(&self) -> std::sync::RwLockReadGuard<'_, Catalog> {
        self.catalog.read().unwrap()
    }

    pub fn mut_catalog(&self) -> std::sync::RwLockWriteGuard<'_, Catalog> {
        self.catalog.write().unwrap()
    }

    pub fn buffer_pool(&self) -> std::sync::RwLockReadGuard<'_, BufferPool> {
        self.buffer_pool.read().unwrap()
    }

    /// Replaces the buffer pool wholesale with an empty one of the given
    /// capacity. Test-only: callers must ensure no transaction is
    /// concurrently touching the old pool, the same discipline
    /// `config::set_page_size` asks of its callers.
    pub fn reset_buffer_pool_for_test(&self, capacity: usize) {
        let mut guard = self.buffer_pool.write().unwrap();
        *guard = BufferPool::new(capacity);
    }
}
