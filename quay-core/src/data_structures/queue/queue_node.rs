use std::cell::UnsafeCell;
use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};

pub(crate) type NodePtr<T> = *mut QueueNode<T>;

/// A link in the queue's singly linked list.
///
/// `next` goes from null to one specific node exactly once (CAS guarded) and
/// is frozen afterwards. `value` is `Some` from enqueue until the single
/// dequeuer that unlinked the predecessor takes it; the sentinel and every
/// consumed node hold `None`.
///
pub(crate) struct QueueNode<T> {
    value: UnsafeCell<Option<T>>,
    next: AtomicPtr<QueueNode<T>>,
}

impl<T> QueueNode<T> {
    pub(crate) fn new(value: T) -> Self {
        QueueNode {
            value: UnsafeCell::new(Some(value)),
            next: AtomicPtr::new(ptr::null_mut()),
        }
    }

    pub(crate) fn new_sentinel() -> Self {
        QueueNode {
            value: UnsafeCell::new(None),
            next: AtomicPtr::new(ptr::null_mut()),
        }
    }

    /// Move the node to the heap and leak it as a raw pointer.
    #[inline]
    pub(crate) fn into_raw(self) -> NodePtr<T> {
        Box::into_raw(Box::new(self))
    }

    /// Free a node previously produced by `into_raw`, dropping any value
    /// still inside it.
    ///
    /// # Safety
    /// `ptr` must come from `into_raw` and must not be reachable by any
    /// other thread.
    pub(crate) unsafe fn dealloc_ptr(ptr: NodePtr<T>) {
        drop(unsafe { Box::from_raw(ptr) });
    }

    // =========================================================================
    // Next pointer accessors
    // =========================================================================

    /// Load next pointer (Acquire ordering)
    #[inline]
    pub(crate) fn get_next(&self) -> NodePtr<T> {
        self.next.load(Ordering::Acquire)
    }

    /// Link `new` after this node if it is still the last one
    /// (Release/Relaxed ordering).
    #[inline]
    pub(crate) fn cas_next(
        &self,
        expected: NodePtr<T>,
        new: NodePtr<T>,
    ) -> Result<NodePtr<T>, NodePtr<T>> {
        self.next
            .compare_exchange(expected, new, Ordering::Release, Ordering::Relaxed)
    }

    // =========================================================================
    // Value accessors
    // =========================================================================

    /// Move the value out, leaving `None`.
    ///
    /// # Safety
    /// Only the thread whose CAS unlinked this node's predecessor from `head`
    /// may call this, and at most once.
    #[inline]
    pub(crate) unsafe fn take_value(&self) -> Option<T> {
        unsafe { (*self.value.get()).take() }
    }

    /// # Safety
    /// Requires exclusive access to the node.
    #[cfg(test)]
    pub(crate) unsafe fn has_value(&self) -> bool {
        unsafe { (*self.value.get()).is_some() }
    }
}
