//! Crossbeam-based reclamation for quay queues.
//!
//! This crate provides `EpochGuard`, an implementation of the `Guard` trait
//! using crossbeam-epoch for memory reclamation, and the `EpochQueue` alias
//! most users want.
//!
//! # Usage
//!
//! ```
//! use quay_crossbeam::EpochQueue;
//!
//! let queue: EpochQueue<i32> = EpochQueue::new();
//! queue.enqueue(42);
//! assert_eq!(queue.dequeue(), Some(42));
//! assert_eq!(queue.dequeue(), None);
//! ```

pub mod epoch_guard;

pub use epoch_guard::EpochGuard;

/// Lock-free FIFO queue whose dequeued nodes are reclaimed by crossbeam-epoch.
pub type EpochQueue<T> = quay_core::LockFreeQueue<T, EpochGuard>;
