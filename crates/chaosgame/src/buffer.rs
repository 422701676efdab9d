//! Accumulation buffer shared by one producer and any number of consumers.
//!
//! Locking
//! - Reads (`read`, `len`) take a shared lock and may run concurrently.
//! - `append`, `append_all`, and `drain_all` take the exclusive lock, so a
//!   drain returns exactly the items appended before it and none twice.

use std::fmt;

use parking_lot::RwLock;

/// Readers-writer protected growable sequence with atomic drain.
pub struct ConcurrentBuffer<T> {
    items: RwLock<Vec<T>>,
}

impl<T> ConcurrentBuffer<T> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: RwLock::new(Vec::with_capacity(capacity)),
        }
    }

    pub fn append(&self, item: T) {
        self.items.write().push(item);
    }

    /// Append all items under a single exclusive lock, preserving order.
    pub fn append_all<I: IntoIterator<Item = T>>(&self, items: I) {
        self.items.write().extend(items);
    }

    /// Take every item currently held and leave the buffer empty.
    pub fn drain_all(&self) -> Vec<T> {
        std::mem::take(&mut *self.items.write())
    }

    /// Run `f` on the current contents without removing them.
    pub fn read<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.items.read())
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

impl<T: Clone> ConcurrentBuffer<T> {
    /// Copy of the current contents.
    pub fn snapshot(&self) -> Vec<T> {
        self.read(|items| items.to_vec())
    }
}

impl<T> Default for ConcurrentBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for ConcurrentBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read(|items| f.debug_struct("ConcurrentBuffer").field("items", &items).finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn drain_returns_items_in_order_and_clears() {
        let buf = ConcurrentBuffer::new();
        buf.append(1);
        buf.append_all([2, 3, 4]);
        assert_eq!(buf.len(), 4);
        assert_eq!(buf.snapshot(), vec![1, 2, 3, 4]);
        assert_eq!(buf.drain_all(), vec![1, 2, 3, 4]);
        assert!(buf.is_empty());
        assert!(buf.drain_all().is_empty());
    }

    #[test]
    fn read_does_not_remove() {
        let buf = ConcurrentBuffer::with_capacity(8);
        buf.append_all(0..5);
        let sum: i32 = buf.read(|items| items.iter().sum());
        assert_eq!(sum, 10);
        assert_eq!(buf.len(), 5);
    }

    #[test]
    fn concurrent_appends_and_drains_lose_nothing() {
        const PRODUCERS: usize = 4;
        const PER_PRODUCER: usize = 5_000;
        let buf = Arc::new(ConcurrentBuffer::<usize>::new());
        let done = Arc::new(AtomicBool::new(false));

        let drainer = {
            let buf = Arc::clone(&buf);
            let done = Arc::clone(&done);
            std::thread::spawn(move || {
                let mut drained = Vec::new();
                while !done.load(Ordering::Acquire) {
                    drained.extend(buf.drain_all());
                    std::thread::yield_now();
                }
                drained
            })
        };

        std::thread::scope(|s| {
            for p in 0..PRODUCERS {
                let buf = &buf;
                s.spawn(move || {
                    for k in 0..PER_PRODUCER {
                        let id = p * PER_PRODUCER + k;
                        if k % 3 == 0 {
                            buf.append_all([id]);
                        } else {
                            buf.append(id);
                        }
                    }
                });
            }
        });
        done.store(true, Ordering::Release);

        let mut all = drainer.join().unwrap();
        all.extend(buf.drain_all());
        assert_eq!(all.len(), PRODUCERS * PER_PRODUCER);
        let unique: HashSet<usize> = all.iter().copied().collect();
        assert_eq!(unique.len(), all.len());

        // Each producer's items keep their relative order across drains.
        for p in 0..PRODUCERS {
            let range = p * PER_PRODUCER..(p + 1) * PER_PRODUCER;
            let mine: Vec<usize> = all.iter().copied().filter(|i| range.contains(i)).collect();
            assert!(mine.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn debug_lists_items() {
        let buf = ConcurrentBuffer::new();
        buf.append("a");
        assert_eq!(format!("{buf:?}"), r#"ConcurrentBuffer { items: ["a"] }"#);
    }
}
