use std::fmt;
use std::marker::PhantomData;
use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};

use crossbeam_utils::{Backoff, CachePadded};

use super::queue_node::{NodePtr, QueueNode};
use super::{ConcurrentQueue, QueueOptions, TryIter};
use crate::guard::Guard;
use crate::trace;

///
/// Unbounded multi-producer/multi-consumer FIFO queue based on Michael and
/// Scott's 'Simple, Fast, and Practical Non-Blocking and Blocking Concurrent
/// Queue Algorithms'. Unlinked nodes are retired to the guard `G` instead of
/// being freed in place.
///
// =============================================================================
// QUEUE LAYOUT
// =============================================================================
//
//   head                                 tail
//    │                                    │
//    ▼                                    ▼
// ┌──────┐    ┌──────┐    ┌──────┐    ┌──────┐
// │ SENT │───►│  10  │───►│  20  │───►│  30  │───► NULL
// │(None)│    │      │    │      │    │      │
// └──────┘    └──────┘    └──────┘    └──────┘
//
// head always points at the sentinel: the node whose value has already been
// taken. The first real element is head.next.
//
// INVARIANTS:
// 1. The list is never empty (at least the sentinel).
// 2. next pointers go null -> node exactly once, then never change.
// 3. tail is head or a successor of head; it may lag behind the true last
//    node by in-flight enqueues, but head never moves past it.
// 4. A node is retired only after head has moved past it, so no new
//    traversal can reach it.
//
// =============================================================================
// ENQUEUE
// =============================================================================
//
// Phase 1: LINK   CAS(tail.next, null, node)    linearization point
// Phase 2: SWING  CAS(tail, t, node)            best effort
//
// Lagging tail (another producer linked but has not swung yet):
//
//          tail
//           ▼
//   ... ─► t ─────► n ───► NULL
//
// t.next is not null, so either help with CAS(tail, t, n) and retry
// (help_lagging_tail) or walk to n locally and link after it.
//
// =============================================================================
// DEQUEUE
// =============================================================================
//
// head == tail, head.next == null   → empty
// head == tail, head.next != null   → tail lags, help it and retry
// head != tail                      → CAS(head, h, n); the winner owns n.value
//                                     and retires h. n becomes the sentinel.
//
// =============================================================================
pub struct LockFreeQueue<T, G: Guard> {
    head: CachePadded<AtomicPtr<QueueNode<T>>>,
    tail: CachePadded<AtomicPtr<QueueNode<T>>>,
    /// Shared guard instance for deferred destruction of dequeued sentinels.
    guard: G,
    options: QueueOptions,
    _marker: PhantomData<T>,
}

// Values are moved in and out, never shared by reference between threads,
// so the queue only needs `T: Send` to be shared.
unsafe impl<T: Send, G: Guard> Send for LockFreeQueue<T, G> {}
unsafe impl<T: Send, G: Guard> Sync for LockFreeQueue<T, G> {}

impl<T, G: Guard> LockFreeQueue<T, G> {
    pub fn new() -> Self {
        Self::with_options(QueueOptions::default())
    }

    pub fn with_options(options: QueueOptions) -> Self {
        let sentinel = QueueNode::new_sentinel().into_raw();
        LockFreeQueue {
            head: CachePadded::new(AtomicPtr::new(sentinel)),
            tail: CachePadded::new(AtomicPtr::new(sentinel)),
            guard: G::default(),
            options,
            _marker: PhantomData,
        }
    }

    pub fn options(&self) -> QueueOptions {
        self.options
    }

    /// Get the guard that dequeued nodes are retired to.
    pub fn guard(&self) -> &G {
        &self.guard
    }

    /// Append `value` at the end of the queue.
    ///
    /// Never blocks. Concurrent producers are ordered by whichever linking
    /// CAS lands first, not by call order.
    ///
    pub fn enqueue(&self, value: T) {
        let _guard = G::pin();
        let node = QueueNode::new(value).into_raw();

        if self.options.help_lagging_tail {
            self.link_helping(node);
        } else {
            self.link_chasing(node);
        }
    }

    /// Remove and return the oldest value, or `None` if the queue is empty.
    ///
    /// Never blocks. Exactly one caller can unlink a given node, so a value
    /// is never returned twice.
    ///
    pub fn dequeue(&self) -> Option<T> {
        let _guard = G::pin();
        let backoff = Backoff::new();

        loop {
            let head = self.head.load(Ordering::Acquire);
            let tail = self.tail.load(Ordering::Acquire);
            // Safety: head was loaded while pinned, so it is not freed yet
            // even if another consumer unlinks it right now.
            let next = unsafe { (*head).get_next() };

            if head != self.head.load(Ordering::Acquire) {
                continue;
            }

            if head == tail {
                if next.is_null() {
                    return None;
                }
                // A producer linked `next` but has not swung tail yet.
                trace::trace!("dequeue helping lagging tail");
                let _ = self.tail.compare_exchange(
                    tail,
                    next,
                    Ordering::Release,
                    Ordering::Relaxed,
                );
                continue;
            }

            debug_assert!(!next.is_null(), "head != tail but head.next is null");

            match self
                .head
                .compare_exchange(head, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => unsafe {
                    // `next` is the new sentinel. Only this thread won the
                    // CAS from `head`, so only this thread may take its value.
                    let value = (*next).take_value();
                    debug_assert!(value.is_some(), "dequeued a node without a value");
                    self.guard.defer_destroy(head, QueueNode::dealloc_ptr);
                    return value;
                },
                Err(_) => self.contend(&backoff),
            }
        }
    }

    /// Returns `true` if the queue had no elements at the time of the call.
    pub fn is_empty(&self) -> bool {
        let _guard = G::pin();
        let head = self.head.load(Ordering::Acquire);
        unsafe { (*head).get_next().is_null() }
    }

    /// Counts linked elements.
    ///
    /// This walks the list, so it is O(n), and it is only exact while no
    /// other thread is enqueuing or dequeuing.
    ///
    pub fn len(&self) -> usize {
        let _guard = G::pin();
        let mut count = 0;
        let mut curr = unsafe { (*self.head.load(Ordering::Acquire)).get_next() };
        while !curr.is_null() {
            count += 1;
            curr = unsafe { (*curr).get_next() };
        }
        count
    }

    /// Iterator that dequeues until the queue reports empty.
    pub fn try_iter(&self) -> TryIter<'_, T, G> {
        TryIter::new(self)
    }

    /// Link by helping a lagging tail forward before retrying.
    fn link_helping(&self, node: NodePtr<T>) {
        let backoff = Backoff::new();

        loop {
            let tail = self.tail.load(Ordering::Acquire);
            // Safety: tail is never retired before head passes it, and we
            // are pinned.
            let next = unsafe { (*tail).get_next() };

            if tail != self.tail.load(Ordering::Acquire) {
                continue;
            }

            if next.is_null() {
                if unsafe { (*tail).cas_next(ptr::null_mut(), node) }.is_ok() {
                    let _ = self.tail.compare_exchange(
                        tail,
                        node,
                        Ordering::Release,
                        Ordering::Relaxed,
                    );
                    return;
                }
                self.contend(&backoff);
            } else {
                let _ = self.tail.compare_exchange(
                    tail,
                    next,
                    Ordering::Release,
                    Ordering::Relaxed,
                );
            }
        }
    }

    /// Link by walking from a tail snapshot to the true end; tail is only
    /// touched once the node is linked.
    fn link_chasing(&self, node: NodePtr<T>) {
        let backoff = Backoff::new();

        loop {
            let snapshot = self.tail.load(Ordering::Acquire);
            let mut last = snapshot;
            loop {
                // Safety: every node after a pinned tail snapshot is either
                // still linked or was retired after we pinned.
                let next = unsafe { (*last).get_next() };
                if next.is_null() {
                    break;
                }
                last = next;
            }

            if unsafe { (*last).cas_next(ptr::null_mut(), node) }.is_ok() {
                let _ = self.tail.compare_exchange(
                    snapshot,
                    node,
                    Ordering::Release,
                    Ordering::Relaxed,
                );
                return;
            }
            self.contend(&backoff);
        }
    }

    #[inline]
    fn contend(&self, backoff: &Backoff) {
        if self.options.backoff {
            backoff.spin();
        }
    }
}

impl<T, G: Guard> Default for LockFreeQueue<T, G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, G: Guard> Drop for LockFreeQueue<T, G> {
    fn drop(&mut self) {
        trace::debug!(undelivered = self.len(), "dropping queue");

        // Exclusive access: free the sentinel and every linked node, dropping
        // the values nobody dequeued. Retired nodes belong to the guard.
        let mut curr = *self.head.get_mut();
        while !curr.is_null() {
            unsafe {
                let next = (*curr).get_next();
                QueueNode::dealloc_ptr(curr);
                curr = next;
            }
        }
    }
}

impl<T, G: Guard> ConcurrentQueue<T> for LockFreeQueue<T, G>
where
    T: Send,
{
    fn enqueue(&self, value: T) {
        LockFreeQueue::enqueue(self, value);
    }

    fn dequeue(&self) -> Option<T> {
        LockFreeQueue::dequeue(self)
    }

    fn is_empty(&self) -> bool {
        LockFreeQueue::is_empty(self)
    }
}

impl<T, G: Guard> Extend<T> for LockFreeQueue<T, G> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.enqueue(value);
        }
    }
}

impl<T, G: Guard> FromIterator<T> for LockFreeQueue<T, G> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = Self::new();
        queue.extend(iter);
        queue
    }
}

impl<T, G: Guard> fmt::Debug for LockFreeQueue<T, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockFreeQueue")
            .field("len", &self.len())
            .field("options", &self.options)
            .finish()
    }
}

// ============================================================================
// Tests - internal structure
// ============================================================================
// Note: behavioural tests shared by every guard are in common_tests.
