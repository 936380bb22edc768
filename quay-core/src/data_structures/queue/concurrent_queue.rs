/// The surface a producer/consumer pipeline needs from a concurrent FIFO.
///
/// Embedders (worker pools, message stages) should depend on this trait
/// rather than on a concrete queue so they never reach into queue internals.
///
pub trait ConcurrentQueue<T>: Send + Sync {
    /// Append a value. Never blocks.
    fn enqueue(&self, value: T);

    /// Remove the oldest value, or `None` if nothing is linked.
    fn dequeue(&self) -> Option<T>;

    /// Snapshot emptiness check.
    fn is_empty(&self) -> bool;
}
