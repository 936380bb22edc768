use std::iter::FusedIterator;

use super::LockFreeQueue;
use crate::guard::Guard;

/// Iterator that dequeues values until the queue reports empty.
///
/// Values enqueued concurrently while iterating may or may not be yielded.
/// Once `next` returns `None` the iterator stays exhausted, even if producers
/// add more values afterwards.
///
pub struct TryIter<'a, T, G: Guard> {
    queue: Option<&'a LockFreeQueue<T, G>>,
}

impl<'a, T, G: Guard> TryIter<'a, T, G> {
    pub(crate) fn new(queue: &'a LockFreeQueue<T, G>) -> Self {
        TryIter { queue: Some(queue) }
    }
}

impl<T, G: Guard> Iterator for TryIter<'_, T, G> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.queue?.dequeue();
        if value.is_none() {
            self.queue = None;
        }
        value
    }
}

impl<T, G: Guard> FusedIterator for TryIter<'_, T, G> {}
