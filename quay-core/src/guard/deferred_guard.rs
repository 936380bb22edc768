//! Deferred guard implementation for testing.
//!
//! This module provides `DeferredGuard`, a simple guard implementation that
//! defers all node destruction until the guard is dropped.

#[cfg(debug_assertions)]
use std::collections::HashSet;
use std::ptr;
use std::sync::atomic::{AtomicPtr, AtomicUsize, Ordering};

use super::Guard;
use crate::trace;

/// A simple guard that defers all node destruction until the guard is dropped.
///
/// This is useful for testing where you want predictable destruction timing.
/// Not suitable for long-running queues as every retired node stays
/// allocated until the owning queue (and with it the guard) is dropped; use
/// `quay_crossbeam::EpochGuard` there.
///
/// # Thread Safety
///
/// Retired nodes are pushed onto an atomic stack, so retiring never blocks
/// a concurrent queue operation. In debug builds the drop checks that no
/// address was retired twice, which would mean a node was unlinked by two
/// different dequeues, and panics instead of freeing it twice.
///
pub struct DeferredGuard {
    retired: AtomicPtr<DeferredNode>,
    pending: AtomicUsize,
}

struct DeferredNode {
    ptr: *mut (),
    dealloc: unsafe fn(*mut ()),
    next: *mut DeferredNode,
}

impl DeferredGuard {
    /// Create a new deferred guard.
    pub fn new() -> Self {
        DeferredGuard {
            retired: AtomicPtr::new(ptr::null_mut()),
            pending: AtomicUsize::new(0),
        }
    }

    /// Number of retired nodes waiting for the guard to drop.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Single push attempt against the `expected` top of the retired stack.
    fn try_push(
        &self,
        node: *mut DeferredNode,
        expected: *mut DeferredNode,
    ) -> Result<(), *mut DeferredNode> {
        unsafe {
            (*node).next = expected;
        }
        self.retired
            .compare_exchange_weak(expected, node, Ordering::Release, Ordering::Relaxed)
            .map(|_| ())
    }

    fn push(&self, node: *mut DeferredNode) {
        let mut top = self.retired.load(Ordering::Relaxed);
        while let Err(current) = self.try_push(node, top) {
            top = current;
        }
        self.pending.fetch_add(1, Ordering::AcqRel);
    }
}

impl Default for DeferredGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DeferredGuard {
    fn drop(&mut self) {
        let mut nodes = Vec::with_capacity(*self.pending.get_mut());
        let mut current = *self.retired.get_mut();
        while !current.is_null() {
            let node = unsafe { Box::from_raw(current) };
            current = node.next;
            nodes.push(node);
        }
        *self.retired.get_mut() = ptr::null_mut();

        #[cfg(debug_assertions)]
        {
            let mut seen = HashSet::with_capacity(nodes.len());
            for node in &nodes {
                let addr = node.ptr as usize;
                if !seen.insert(addr) {
                    trace::error!(addr, "node retired twice");
                    // Nothing is freed: the payload leaks rather than being freed twice.
                    panic!("DUPLICATE defer_destroy at {:#x}", addr);
                }
            }
        }

        trace::debug!(reclaimed = nodes.len(), "deferred guard releasing nodes");

        for node in nodes {
            unsafe {
                (node.dealloc)(node.ptr);
            }
        }
    }
}

impl Guard for DeferredGuard {
    /// Nothing to pin: all nodes stay valid until the stored guard drops.
    type ReadGuard = ();

    fn pin() -> Self::ReadGuard {}

    unsafe fn defer_destroy<N>(&self, node: *mut N, dealloc: unsafe fn(*mut N)) {
        let node = Box::into_raw(Box::new(DeferredNode {
            ptr: node as *mut (),
            dealloc: unsafe {
                std::mem::transmute::<unsafe fn(*mut N), unsafe fn(*mut ())>(dealloc)
            },
            next: ptr::null_mut(),
        }));
        self.push(node);
    }
}
