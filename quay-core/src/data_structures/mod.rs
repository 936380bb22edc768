//! Data structures for concurrent pipelines.
//!
//! # Organization
//!
//! - [`queue`] - Lock-free unbounded MPMC FIFO queue

pub mod queue;

// Re-exports for convenience
pub use queue::{ConcurrentQueue, LockFreeQueue, QueueOptions, TryIter};
