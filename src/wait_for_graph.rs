use std::collections::{HashMap, HashSet};

use crate::transaction_id::TransactionId;

/// Directed graph whose nodes are transactions and whose edges record
/// "transaction A is waiting for a page held by transaction B". Mutated
/// only under the buffer pool's monitor, alongside the lock table, so
/// that the graph and the lock table it is derived from can never drift
/// apart (the single-authoritative-graph discipline this spec's design
/// notes call for).
pub struct WaitForGraph {
    edges: HashMap<TransactionId, HashSet<TransactionId>>,
}

impl WaitForGraph {
    pub fn new() -> Self {
        Self {
            edges: HashMap::new(),
        }
    }

    pub fn add_edge(&mut self, waiter: TransactionId, holder: TransactionId) {
        if waiter == holder {
            return;
        }
        self.edges.entry(waiter).or_insert_with(HashSet::new).insert(holder);
    }

    pub fn remove_edge(&mut self, waiter: TransactionId, holder: TransactionId) {
        if let Some(set) = self.edges.get_mut(&waiter) {
            set.remove(&holder);
        }
    }

    /// Removes every edge whose waiter is `tid`.
    pub fn remove_outgoing(&mut self, tid: TransactionId) {
        self.edges.remove(&tid);
    }

    /// Replaces `tid`'s entire outgoing edge set. Used to keep the
    /// "waiter waits for current holders" edges fresh on every retry of a
    /// blocked acquire, instead of letting stale edges to transactions
    /// that have since released the page linger in the graph.
    pub fn set_outgoing(&mut self, tid: TransactionId, holders: HashSet<TransactionId>) {
        if holders.is_empty() {
            self.edges.remove(&tid);
        } else {
            self.edges.insert(tid, holders);
        }
    }

    /// Removes every edge whose holder is `tid`.
    pub fn remove_incoming(&mut self, tid: TransactionId) {
        for set in self.edges.values_mut() {
            set.remove(&tid);
        }
    }

    /// Removes every edge mentioning `tid`, in either direction.
    pub fn remove_transaction(&mut self, tid: TransactionId) {
        self.remove_outgoing(tid);
        self.remove_incoming(tid);
    }

    /// Depth-first search from `waiter`'s neighbors: true if any of them
    /// can reach `waiter` again, i.e. granting `waiter`'s wait would close
    /// a cycle in the waits-for graph.
    pub fn creates_cycle(&self, waiter: TransactionId) -> bool {
        let neighbors = match self.edges.get(&waiter) {
            Some(n) => n.clone(),
            None => return false,
        };

        let mut visited = HashSet::new();
        for neighbor in neighbors {
            if self.can_reach(neighbor, waiter, &mut visited) {
                return true;
            }
        }
        false
    }

    fn can_reach(
        &self,
        from: TransactionId,
        target: TransactionId,
        visited: &mut HashSet<TransactionId>,
    ) -> bool {
        if from == target {
            return true;
        }
        if !visited.insert(from) {
            return false;
        }
        if let Some(neighbors) = self.edges.get(&from) {
            for &next in neighbors {
                if self.can_reach(next, target, visited) {
                    return true;
                }
            }
        }
        false
    }
}
