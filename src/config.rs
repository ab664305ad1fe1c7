use std::sync::atomic::{AtomicUsize, Ordering};

/// Default page size, in bytes. Matches the classic SimpleDB default
/// that the rest of this crate's tests assume.
pub const DEFAULT_PAGE_SIZE: usize = 4096;

/// Default buffer pool capacity, in pages.
pub const DEFAULT_BUFFER_POOL_PAGES: usize = 50;

static PAGE_SIZE: AtomicUsize = AtomicUsize::new(DEFAULT_PAGE_SIZE);

/// Returns the process-wide page size.
pub fn page_size() -> usize {
    PAGE_SIZE.load(Ordering::SeqCst)
}

/// Overrides the process-wide page size. Tests only: this must be called
/// before any `BufferPool`/`HeapFile` is constructed, never while one is
/// live, since pages already cached under the old size would silently
/// become mis-sized.
pub fn set_page_size(size: usize) {
    PAGE_SIZE.store(size, Ordering::SeqCst);
}

/// Restores the default page size. Tests call this in teardown so that
/// a size override in one test does not leak into the next.
pub fn reset_page_size() {
    set_page_size(DEFAULT_PAGE_SIZE);
}
