use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use itertools::Itertools;
use log::{debug, info, warn};

use crate::error::SmallError;
use crate::heap_file::HeapFile;
use crate::lock_manager::{LockManager, Permission};
use crate::page::HeapPage;
use crate::page_id::PageId;
use crate::transaction_id::TransactionId;
use crate::tuple::Tuple;
use crate::wait_for_graph::WaitForGraph;

struct PoolState {
    pages: HashMap<PageId, HeapPage>,
    /// Cache insertion order, oldest first. Used only to make eviction's
    /// "pick a clean, unlocked page" choice deterministic across runs.
    insertion_order: Vec<PageId>,
    locks: LockManager,
    graph: WaitForGraph,
    /// Page each currently-suspended transaction is blocked on, so that a
    /// waiter can be told about peers already waiting on the same page.
    blocked_on: HashMap<TransactionId, PageId>,
    /// Every table's backing file, registered lazily the first time a
    /// page from that table passes through `get_page`. Lets `transaction_
    /// complete`, eviction, and `flush_*` reach the file store without
    /// every caller threading a `HeapFile` through every call.
    files: HashMap<i32, Arc<HeapFile>>,
}

impl PoolState {
    fn new() -> Self {
        Self {
            pages: HashMap::new(),
            insertion_order: Vec::new(),
            locks: LockManager::new(),
            graph: WaitForGraph::new(),
            blocked_on: HashMap::new(),
            files: HashMap::new(),
        }
    }

    fn remove_page(&mut self, pid: PageId) {
        if self.pages.remove(&pid).is_some() {
            self.insertion_order.retain(|p| *p != pid);
        }
    }

    fn insert_page(&mut self, pid: PageId, page: HeapPage) {
        if !self.pages.contains_key(&pid) {
            self.insertion_order.push(pid);
        }
        self.pages.insert(pid, page);
    }
}

/// The single entry point through which executors and file stores obtain
/// pages, and the authority that commits or aborts transactions. All of
/// its public operations are serialized by one process-wide monitor
/// (`state` + `condvar`); suspension happens only inside `get_page`.
pub struct BufferPool {
    capacity: usize,
    state: Mutex<PoolState>,
    condvar: Condvar,
}

impl BufferPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(PoolState::new()),
            condvar: Condvar::new(),
        }
    }

    fn lock_state(&self) -> Result<MutexGuard<PoolState>, SmallError> {
        // A poisoned monitor (a panic while held, e.g. inside a failing
        // test) is treated like a thread interrupted while suspended: the
        // caller's transaction must abort rather than observe torn state.
        self.state
            .lock()
            .map_err(|_| SmallError::TransactionAborted)
    }

    /// See §4.4.1: acquire `pid` under `perm` on behalf of `tid`, blocking
    /// and participating in deadlock detection as needed; install the
    /// page from `file` on a cache miss.
    pub fn get_page(
        &self,
        tid: TransactionId,
        pid: PageId,
        perm: Permission,
        file: &Arc<HeapFile>,
    ) -> Result<HeapPage, SmallError> {
        let mut state = self.lock_state()?;
        state.files.entry(pid.table_id).or_insert_with(|| file.clone());

        let mut entered_waiting = false;
        loop {
            // Edges are inferred on demand: recompute who `tid` is
            // waiting on every pass, so a holder that released while
            // `tid` slept doesn't leave a stale edge behind.
            let holders: HashSet<TransactionId> =
                state.locks.other_holders(pid, tid).into_iter().collect();
            state.graph.set_outgoing(tid, holders);

            let peers: Vec<TransactionId> = state
                .blocked_on
                .iter()
                .filter(|(&w, &p)| p == pid && w != tid)
                .map(|(&w, _)| w)
                .collect();
            for peer in peers {
                state.graph.add_edge(peer, tid);
            }

            if state.locks.acquire(tid, pid, perm) {
                break;
            }

            if !entered_waiting {
                state.blocked_on.insert(tid, pid);
                entered_waiting = true;
            }

            if state.graph.creates_cycle(tid) {
                warn!("deadlock detected, aborting {}", tid);
                state.graph.remove_outgoing(tid);
                state.blocked_on.remove(&tid);
                return Err(SmallError::TransactionAborted);
            }

            debug!("{} blocked on {:?}", tid, pid);
            state = self
                .condvar
                .wait(state)
                .map_err(|_| SmallError::TransactionAborted)?;
        }

        if entered_waiting {
            state.blocked_on.remove(&tid);
        }
        // §4.4.1 step 4: remove edges both originating from `tid` (what
        // it was waiting on) and pointing to it (peers who were waiting
        // behind it on this same page) — leaving the latter in place
        // would let a later, unrelated wait on `tid` rediscover this
        // stale edge and report a cycle that no longer exists.
        state.graph.remove_outgoing(tid);
        state.graph.remove_incoming(tid);

        if !state.pages.contains_key(&pid) {
            if state.pages.len() >= self.capacity {
                self.evict_one(&mut state)?;
            }
            let page = file.read_page(pid)?;
            state.insert_page(pid, page);
        }

        Ok(state.pages.get(&pid).unwrap().clone())
    }

    /// Releases `tid`'s lock on `pid` unconditionally (a trusted call,
    /// risky outside strict 2PL): clears incident waits-for edges and
    /// wakes every waiter.
    pub fn release_page(&self, tid: TransactionId, pid: PageId) -> Result<(), SmallError> {
        let mut state = self.lock_state()?;
        state.locks.release(tid, pid);
        state.graph.remove_outgoing(tid);
        drop(state);
        self.condvar.notify_all();
        Ok(())
    }

    /// §4.4.3: delegates to the file store, then marks the returned page
    /// dirty under `tid` and replaces its cache entry.
    pub fn insert_tuple(
        &self,
        tid: TransactionId,
        tuple: Tuple,
        file: &Arc<HeapFile>,
    ) -> Result<Vec<PageId>, SmallError> {
        let mut page = file.insert_tuple(tid, tuple, self)?;
        let pid = page.page_id();
        page.mark_dirty(true, Some(tid));

        let mut state = self.lock_state()?;
        state.insert_page(pid, page);
        Ok(vec![pid])
    }

    /// §4.4.3: the delete-side counterpart of `insert_tuple`.
    pub fn delete_tuple(
        &self,
        tid: TransactionId,
        tuple: &Tuple,
        file: &Arc<HeapFile>,
    ) -> Result<Vec<PageId>, SmallError> {
        let mut page = file.delete_tuple(tid, tuple, self)?;
        let pid = page.page_id();
        page.mark_dirty(true, Some(tid));

        let mut state = self.lock_state()?;
        state.insert_page(pid, page);
        Ok(vec![pid])
    }

    /// §4.4.4: on commit, flush every dirty page held by `tid`; on abort,
    /// re-read every page held by `tid` from disk and reinstall it clean.
    /// Either way, remove `tid`'s waits-for edges, release its locks, and
    /// wake all waiters.
    pub fn transaction_complete(&self, tid: TransactionId, commit: bool) -> Result<(), SmallError> {
        let mut state = self.lock_state()?;
        let pages = state.locks.transaction_pages(tid);

        if commit {
            for pid in &pages {
                let is_dirtier = state
                    .pages
                    .get(pid)
                    .and_then(|p| p.is_dirty())
                    .map(|dirtier| dirtier == tid)
                    .unwrap_or(false);
                if !is_dirtier {
                    continue;
                }
                let file = state.files.get(&pid.table_id).cloned();
                if let Some(file) = file {
                    let page = state.pages.get(pid).unwrap().clone();
                    // I/O errors here propagate out, leaving locks and
                    // the waits-for graph intact for the caller to retry.
                    file.write_page(&page)?;
                    state.pages.get_mut(pid).unwrap().mark_dirty(false, None);
                }
            }
            info!("{} committed, flushed {} page(s)", tid, pages.len());
        } else {
            for pid in &pages {
                let file = state.files.get(&pid.table_id).cloned();
                if let Some(file) = file {
                    let fresh = file.read_page(*pid)?;
                    state.insert_page(*pid, fresh);
                }
            }
            info!("{} aborted, rolled back {} page(s)", tid, pages.len());
        }

        state.locks.clear_transaction(tid);
        state.graph.remove_transaction(tid);
        state.blocked_on.remove(&tid);

        drop(state);
        self.condvar.notify_all();
        Ok(())
    }

    /// §4.4.5: pick a clean page that no transaction currently locks
    /// (even a shared holder) and that isn't dirty, in cache-insertion
    /// order for test determinism. Fails if every page is dirty or held.
    fn evict_one(&self, state: &mut MutexGuard<PoolState>) -> Result<(), SmallError> {
        let candidate = state.insertion_order.iter().copied().find(|pid| {
            let dirty = state.pages.get(pid).and_then(|p| p.is_dirty()).is_some();
            !dirty && !state.locks.has_any_holder(*pid)
        });

        match candidate {
            Some(pid) => {
                debug!("evicting clean page {:?}", pid);
                state.remove_page(pid);
                Ok(())
            }
            None => Err(SmallError::DbException(
                "no clean pages to evict".to_string(),
            )),
        }
    }

    /// Write-through for a single page; a no-op if it isn't cached or
    /// isn't dirty.
    pub fn flush_page(&self, pid: PageId) -> Result<(), SmallError> {
        let mut state = self.lock_state()?;
        self.flush_page_locked(&mut state, pid)
    }

    fn flush_page_locked(&self, state: &mut MutexGuard<PoolState>, pid: PageId) -> Result<(), SmallError> {
        let dirty = state.pages.get(&pid).and_then(|p| p.is_dirty());
        if dirty.is_none() {
            return Ok(());
        }
        let file = state.files.get(&pid.table_id).cloned();
        if let Some(file) = file {
            let page = state.pages.get(&pid).unwrap().clone();
            file.write_page(&page)?;
            state.pages.get_mut(&pid).unwrap().mark_dirty(false, None);
        }
        Ok(())
    }

    pub fn flush_all_pages(&self) -> Result<(), SmallError> {
        let mut state = self.lock_state()?;
        let pids: Vec<PageId> = state.pages.keys().copied().sorted().collect();
        for pid in pids {
            self.flush_page_locked(&mut state, pid)?;
        }
        Ok(())
    }

    /// Removes a page from the cache without flushing it.
    pub fn discard_page(&self, pid: PageId) -> Result<(), SmallError> {
        let mut state = self.lock_state()?;
        state.remove_page(pid);
        Ok(())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn cached_page_count(&self) -> Result<usize, SmallError> {
        Ok(self.lock_state()?.pages.len())
    }

    /// Whether `pid` is currently cached.
    pub fn contains_page(&self, pid: PageId) -> Result<bool, SmallError> {
        Ok(self.lock_state()?.pages.contains_key(&pid))
    }

    /// Whether the lock table records `tid` as holding `pid` with at
    /// least `perm`. Used by tests to check invariant 7.
    pub fn holds_lock(
        &self,
        tid: TransactionId,
        pid: PageId,
        perm: Permission,
    ) -> Result<bool, SmallError> {
        Ok(self.lock_state()?.locks.holds(pid, tid, perm))
    }

    /// Whether `tid` holds any lock at all. Used by tests to check
    /// invariant 1 (no lock-table entry survives `transaction_complete`).
    pub fn holds_any_lock(&self, tid: TransactionId) -> Result<bool, SmallError> {
        Ok(!self.lock_state()?.locks.transaction_pages(tid).is_empty())
    }

    /// Empties the cache without flushing. Test-only: callers must ensure
    /// no transaction is mid-flight.
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        state.pages.clear();
        state.insertion_order.clear();
    }
}
