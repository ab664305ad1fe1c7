use std::collections::{HashMap, HashSet};

use itertools::Itertools;

use crate::page_id::PageId;
use crate::transaction_id::TransactionId;

/// The access mode requested for, or held on, a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Shared,
    Exclusive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Shared,
    Exclusive,
}

/// Per-page reader-writer lock state: a mode flag and the set of holder
/// transactions. If `mode` is `Exclusive`, `holders` has exactly one
/// entry; if `Shared`, `holders` may contain any number. An empty
/// `holders` set means the page is unlocked (`mode` is reset to `Shared`
/// for the next acquirer).
#[derive(Debug)]
struct LockSet {
    mode: Mode,
    holders: HashSet<TransactionId>,
}

impl LockSet {
    fn new() -> Self {
        Self {
            mode: Mode::Shared,
            holders: HashSet::new(),
        }
    }

    /// Non-blocking acquire attempt; see the lock table contract.
    fn acquire(&mut self, tid: TransactionId, perm: Permission) -> bool {
        let already_holds = self.holders.contains(&tid);

        if already_holds {
            return match perm {
                Permission::Shared => true,
                Permission::Exclusive => match self.mode {
                    Mode::Exclusive => true,
                    Mode::Shared if self.holders.len() == 1 => {
                        self.mode = Mode::Exclusive;
                        true
                    }
                    Mode::Shared => false,
                },
            };
        }

        if self.holders.is_empty() {
            self.mode = match perm {
                Permission::Shared => Mode::Shared,
                Permission::Exclusive => Mode::Exclusive,
            };
            self.holders.insert(tid);
            return true;
        }

        match (self.mode, perm) {
            (Mode::Shared, Permission::Shared) => {
                self.holders.insert(tid);
                true
            }
            _ => false,
        }
    }

    /// Removes `tid` from the holder set; returns whether it was present.
    fn release(&mut self, tid: TransactionId) -> bool {
        let was_present = self.holders.remove(&tid);
        if self.holders.is_empty() {
            self.mode = Mode::Shared;
        }
        was_present
    }
}

/// Per-page shared/exclusive lock table, supporting upgrade from shared to
/// exclusive when a single holder requests it. This type performs no
/// synchronization of its own: the buffer pool owns a single instance
/// behind its monitor mutex, so every call here is already serialized with
/// respect to every other lock table mutation.
pub struct LockManager {
    locks: HashMap<PageId, LockSet>,
}

impl LockManager {
    pub fn new() -> Self {
        Self {
            locks: HashMap::new(),
        }
    }

    /// Non-blocking acquire attempt against `pid`'s lock set, created
    /// lazily on first use.
    pub fn acquire(&mut self, tid: TransactionId, pid: PageId, perm: Permission) -> bool {
        self.locks.entry(pid).or_insert_with(LockSet::new).acquire(tid, perm)
    }

    /// Releases `tid`'s lock on `pid`, if held. Returns whether it was held.
    pub fn release(&mut self, tid: TransactionId, pid: PageId) -> bool {
        match self.locks.get_mut(&pid) {
            Some(set) => set.release(tid),
            None => false,
        }
    }

    /// Releases `tid` from every lock set it holds, returning the pages it
    /// had locked.
    pub fn clear_transaction(&mut self, tid: TransactionId) -> Vec<PageId> {
        let pages = self.transaction_pages(tid);
        for pid in &pages {
            self.release(tid, *pid);
        }
        pages
    }

    /// The set of pages on which `tid` currently appears as a holder, in a
    /// deterministic order (sorted by `PageId`) so that commit/abort flush
    /// the same page in the same order on every run.
    pub fn transaction_pages(&self, tid: TransactionId) -> Vec<PageId> {
        self.locks
            .iter()
            .filter(|(_, set)| set.holders.contains(&tid))
            .map(|(pid, _)| *pid)
            .sorted()
            .collect()
    }

    /// Every transaction currently holding `pid`, other than `tid` itself.
    pub fn other_holders(&self, pid: PageId, tid: TransactionId) -> Vec<TransactionId> {
        match self.locks.get(&pid) {
            Some(set) => set.holders.iter().filter(|&&h| h != tid).copied().collect(),
            None => Vec::new(),
        }
    }

    /// Whether any transaction currently holds a lock (shared or
    /// exclusive) on `pid`.
    pub fn has_any_holder(&self, pid: PageId) -> bool {
        match self.locks.get(&pid) {
            Some(set) => !set.holders.is_empty(),
            None => false,
        }
    }

    /// Whether `tid` holds at least `perm` on `pid`.
    pub fn holds(&self, pid: PageId, tid: TransactionId, perm: Permission) -> bool {
        match self.locks.get(&pid) {
            Some(set) => {
                set.holders.contains(&tid)
                    && match perm {
                        Permission::Shared => true,
                        Permission::Exclusive => set.mode == Mode::Exclusive,
                    }
            }
            None => false,
        }
    }
}
