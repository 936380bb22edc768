//! Epoch-based guard implementation using crossbeam-epoch.
//!
//! # Design
//!
//! `EpochGuard` is a zero-sized type that schedules destruction using the global
//! epoch collector. Queues parameterized with `EpochGuard` get epoch-based
//! memory reclamation:
//!
//! ```text
//! LockFreeQueue<T, EpochGuard>
//!     │
//!     ├── enqueue/dequeue pin the thread for the whole CAS loop
//!     └── dequeued sentinels are freed once every pinned thread moved on
//! ```

use crossbeam_epoch::{self as epoch, Guard as CrossbeamGuard};
use quay_core::guard::Guard;

/// Epoch-based memory reclamation guard.
///
/// Nodes are not freed until all threads have advanced past the epoch in
/// which they were retired, so a consumer that loaded `head` just before
/// another consumer unlinked it can still read `head.next` safely.
///
/// # Design
///
/// Unlike `DeferredGuard` which stores pending destructions, `EpochGuard`
/// is a zero-sized type that schedules destruction using the global epoch
/// collector. This keeps memory bounded on long-running queues.
///
/// When `defer_destroy` is called, it:
/// 1. Pins the current thread (nested inside the operation's own pin)
/// 2. Schedules the destruction to run after all threads have advanced
/// 3. Unpins (the destruction is managed globally)
///
/// # Thread Safety
///
/// `EpochGuard` is `Send` and `Sync` - it can be safely shared across threads.
///
#[derive(Clone, Copy, Default)]
pub struct EpochGuard {
    // Zero-sized - all state is in the global epoch collector
}

impl EpochGuard {
    /// Create a new epoch guard.
    pub fn new() -> Self {
        EpochGuard {}
    }

    /// Ask the global collector to run any destructions that are already
    /// safe. Useful in tests that count drops.
    pub fn flush() {
        epoch::pin().flush();
    }
}

impl Guard for EpochGuard {
    /// For EpochGuard, ReadGuard is an actual crossbeam epoch guard
    /// that pins the current thread for the duration of an operation.
    type ReadGuard = CrossbeamGuard;

    fn pin() -> Self::ReadGuard {
        epoch::pin()
    }

    unsafe fn defer_destroy<N>(&self, node: *mut N, dealloc: unsafe fn(*mut N)) {
        let guard = epoch::pin();
        unsafe {
            guard.defer_unchecked(move || {
                dealloc(node);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct DropCounter(Arc<AtomicUsize>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_epoch_guard_is_zero_sized() {
        assert_eq!(std::mem::size_of::<EpochGuard>(), 0);
    }

    #[test]
    #[serial(epoch)]
    fn test_deferred_node_eventually_freed() {
        let drops = Arc::new(AtomicUsize::new(0));
        let guard = EpochGuard::default();

        let ptr = Box::into_raw(Box::new(DropCounter(Arc::clone(&drops))));
        unsafe {
            guard.defer_destroy(ptr, |p| drop(Box::from_raw(p)));
        }

        // The collector advances the epoch lazily; keep nudging it.
        for _ in 0..10_000 {
            if drops.load(Ordering::SeqCst) == 1 {
                break;
            }
            EpochGuard::flush();
            std::thread::yield_now();
        }
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[serial(epoch)]
    fn test_not_freed_while_pinned() {
        let drops = Arc::new(AtomicUsize::new(0));
        let guard = EpochGuard::default();

        let reader = EpochGuard::pin();
        let ptr = Box::into_raw(Box::new(DropCounter(Arc::clone(&drops))));
        unsafe {
            guard.defer_destroy(ptr, |p| drop(Box::from_raw(p)));
        }

        for _ in 0..100 {
            EpochGuard::flush();
        }
        assert_eq!(drops.load(Ordering::SeqCst), 0);
        drop(reader);
    }
}
