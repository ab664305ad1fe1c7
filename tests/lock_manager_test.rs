use small_db::{LockManager, PageId, Permission, TransactionId};

mod common;

fn pid() -> PageId {
    PageId::new(1, 0)
}

#[test]
fn shared_locks_are_compatible() {
    common::setup();
    let mut locks = LockManager::new();
    let t1 = TransactionId::new();
    let t2 = TransactionId::new();

    assert!(locks.acquire(t1, pid(), Permission::Shared));
    assert!(locks.acquire(t2, pid(), Permission::Shared));
    assert!(locks.holds(pid(), t1, Permission::Shared));
    assert!(locks.holds(pid(), t2, Permission::Shared));
}

#[test]
fn exclusive_excludes_everyone_else() {
    common::setup();
    let mut locks = LockManager::new();
    let t1 = TransactionId::new();
    let t2 = TransactionId::new();

    assert!(locks.acquire(t1, pid(), Permission::Exclusive));
    assert!(!locks.acquire(t2, pid(), Permission::Shared));
    assert!(!locks.acquire(t2, pid(), Permission::Exclusive));
}

#[test]
fn sole_shared_holder_upgrades() {
    common::setup();
    let mut locks = LockManager::new();
    let t1 = TransactionId::new();

    assert!(locks.acquire(t1, pid(), Permission::Shared));
    assert!(locks.acquire(t1, pid(), Permission::Exclusive));
    assert!(locks.holds(pid(), t1, Permission::Exclusive));
}

#[test]
fn upgrade_fails_with_a_second_shared_holder() {
    common::setup();
    let mut locks = LockManager::new();
    let t1 = TransactionId::new();
    let t2 = TransactionId::new();

    assert!(locks.acquire(t1, pid(), Permission::Shared));
    assert!(locks.acquire(t2, pid(), Permission::Shared));
    assert!(!locks.acquire(t1, pid(), Permission::Exclusive));
    // t1 keeps its shared lock; the failed upgrade attempt is not destructive.
    assert!(locks.holds(pid(), t1, Permission::Shared));
}

#[test]
fn release_reopens_the_page_for_exclusive_access() {
    common::setup();
    let mut locks = LockManager::new();
    let t1 = TransactionId::new();
    let t2 = TransactionId::new();

    assert!(locks.acquire(t1, pid(), Permission::Shared));
    assert!(locks.release(t1, pid()));
    assert!(locks.acquire(t2, pid(), Permission::Exclusive));
}

#[test]
fn clear_transaction_drops_every_page_it_holds() {
    common::setup();
    let mut locks = LockManager::new();
    let t1 = TransactionId::new();
    let p0 = PageId::new(1, 0);
    let p1 = PageId::new(1, 1);

    locks.acquire(t1, p0, Permission::Shared);
    locks.acquire(t1, p1, Permission::Exclusive);
    let cleared = locks.clear_transaction(t1);
    assert_eq!(cleared.len(), 2);
    assert!(locks.transaction_pages(t1).is_empty());
    assert!(!locks.has_any_holder(p0));
    assert!(!locks.has_any_holder(p1));
}

#[test]
fn repeated_shared_request_is_a_no_op() {
    common::setup();
    let mut locks = LockManager::new();
    let t1 = TransactionId::new();

    assert!(locks.acquire(t1, pid(), Permission::Shared));
    assert!(locks.acquire(t1, pid(), Permission::Shared));
    assert_eq!(locks.other_holders(pid(), TransactionId::new()).len(), 1);
}
