//! Lock-free FIFO queue.

mod concurrent_queue;
mod lock_free_queue;
mod queue_node;
mod queue_options;
mod try_iter;

pub use concurrent_queue::ConcurrentQueue;
pub use lock_free_queue::LockFreeQueue;
pub use queue_options::QueueOptions;
pub use try_iter::TryIter;
