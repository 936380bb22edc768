//! Guard trait for memory reclamation strategies.
//!
//! A node unlinked from a lock-free structure may still be dereferenced by
//! other threads that loaded its address before the unlink. The `Guard` trait
//! abstracts over how such nodes are retired and eventually freed.
//!
//! ```text
//! LockFreeQueue<T, G: Guard>
//!     │
//!     ├── LockFreeQueue<T, EpochGuard>      (production, quay-crossbeam)
//!     └── LockFreeQueue<T, DeferredGuard>   (testing)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use quay_core::LockFreeQueue;
//! use quay_crossbeam::EpochGuard;
//!
//! let queue: LockFreeQueue<i32, EpochGuard> = LockFreeQueue::new();
//! queue.enqueue(42);
//! assert_eq!(queue.dequeue(), Some(42));
//! ```

mod deferred_guard;

pub use deferred_guard::DeferredGuard;

/// A memory reclamation guard that protects concurrent access to nodes.
///
/// # Safety Contract
///
/// Implementations must ensure that a node passed to `defer_destroy` is not
/// freed while any `ReadGuard` pinned before the call is still alive.
///
/// Because retired memory is never handed back to the allocator while a
/// pinned reader may hold its address, a CAS can never succeed against a
/// recycled node (no ABA), and the structures built on top do not need
/// tagged pointers.
///
pub trait Guard: Sized + Default + Send + Sync {
    /// An active guard that protects reads for its lifetime.
    ///
    /// For epoch-based guards, this holds a pinned `crossbeam_epoch::Guard`.
    /// For deferred guards, this is `()` since nothing is freed before the
    /// owning structure drops.
    ///
    type ReadGuard: Sized;

    /// Pin an active read guard for the duration of one operation.
    fn pin() -> Self::ReadGuard;

    /// Schedule a node for deferred destruction.
    ///
    /// # Safety
    ///
    /// - `node` must be a valid pointer previously allocated by the structure
    /// - `node` must be unlinked (not reachable by new traversals)
    /// - `node` must not be retired more than once
    /// - `dealloc` must be the correct deallocation function for `node`
    ///
    unsafe fn defer_destroy<N>(&self, node: *mut N, dealloc: unsafe fn(*mut N));
}
