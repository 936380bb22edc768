//! Lock-free building blocks for producer/consumer pipelines.
//!
//! The central type is [`LockFreeQueue`], an unbounded multi-producer
//! multi-consumer FIFO that never takes a lock. It is generic over a
//! [`Guard`] that decides when unlinked nodes may be freed:
//!
//! - `quay_crossbeam::EpochGuard` hands them to crossbeam-epoch; use it (or
//!   the `quay_crossbeam::EpochQueue` alias) for long-running queues
//! - [`DeferredGuard`] (this crate) keeps them until the queue drops, which
//!   suits tests and short-lived queues
//!
//! ```
//! use quay_core::{DeferredGuard, LockFreeQueue};
//!
//! let queue: LockFreeQueue<u32, DeferredGuard> = LockFreeQueue::new();
//! queue.enqueue(10);
//! queue.enqueue(20);
//!
//! assert_eq!(queue.dequeue(), Some(10));
//! assert_eq!(queue.dequeue(), Some(20));
//! assert_eq!(queue.dequeue(), None);
//! ```

pub mod common_tests;
pub mod data_structures;
pub mod guard;
pub mod trace;

// Re-export the common types for convenience
pub use data_structures::{ConcurrentQueue, LockFreeQueue, QueueOptions, TryIter};
pub use guard::{DeferredGuard, Guard};
