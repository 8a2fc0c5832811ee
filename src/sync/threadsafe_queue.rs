use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize,Ordering};
use std::time::{Duration,Instant};

use color_eyre::eyre::{Result,ensure};
use parking_lot::{Mutex,Condvar};

/**
 * Capacity-bounded FIFO shared between one producer and one consumer.
 *
 * When the queue is full, `push` either evicts the oldest unread item
 * (`drop_oldest_if_full`) or blocks until the consumer made room.
 * Every operation holds the lock for its whole duration.
 */
pub struct ThreadsafeQueue<T> {
    queue: Mutex<VecDeque<T>>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: usize,
    drop_oldest_if_full: bool,
    dropped: AtomicUsize
}

impl<T> ThreadsafeQueue<T> {

    pub fn new(capacity: usize, drop_oldest_if_full: bool) -> Result<ThreadsafeQueue<T>> {
        ensure!(capacity > 0, "queue capacity must be at least 1");
        Ok(ThreadsafeQueue {
            queue: Mutex::new(VecDeque::with_capacity(capacity)),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
            drop_oldest_if_full,
            dropped: AtomicUsize::new(0)
        })
    }

    /**
     * Appends an item. Returns the evicted item if the queue was full and drops the oldest.
     */
    pub fn push(&self, item: T) -> Option<T> {
        let mut queue = self.queue.lock();
        let mut evicted = None;

        if queue.len() >= self.capacity {
            if self.drop_oldest_if_full {
                evicted = queue.pop_front();
                self.dropped.fetch_add(1, Ordering::Relaxed);
            } else {
                while queue.len() >= self.capacity {
                    self.not_full.wait(&mut queue);
                }
            }
        }

        queue.push_back(item);
        drop(queue);
        self.not_empty.notify_one();
        evicted
    }

    pub fn pop(&self) -> Option<T> {
        let item = self.queue.lock().pop_front();
        if item.is_some() {
            self.not_full.notify_one();
        }
        item
    }

    /**
     * Pops the front item only if it satisfies the predicate. Peek and pop happen under one lock.
     */
    pub fn pop_if<F>(&self, predicate: F) -> Option<T> where F: FnOnce(&T) -> bool {
        let mut queue = self.queue.lock();
        let item = match queue.front() {
            Some(front) if predicate(front) => queue.pop_front(),
            _ => None
        };
        drop(queue);
        if item.is_some() {
            self.not_full.notify_one();
        }
        item
    }

    pub fn pop_blocking_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut queue = self.queue.lock();
        while queue.is_empty() {
            if self.not_empty.wait_until(&mut queue, deadline).timed_out() {
                break;
            }
        }
        let item = queue.pop_front();
        drop(queue);
        if item.is_some() {
            self.not_full.notify_one();
        }
        item
    }

    pub fn peek_front(&self) -> Option<T> where T: Clone {
        self.queue.lock().front().cloned()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn dropped_count(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn clear(&self) -> () {
        self.queue.lock().clear();
        self.not_full.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(ThreadsafeQueue::<u32>::new(0, true).is_err());
    }

    #[test]
    fn full_queue_evicts_oldest() {
        let queue = ThreadsafeQueue::new(3, true).unwrap();
        for i in 0..3 {
            assert_eq!(queue.push(i), None);
        }
        assert_eq!(queue.push(3), Some(0));
        assert_eq!(queue.push(4), Some(1));
        assert_eq!(queue.dropped_count(), 2);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), Some(3));
        assert_eq!(queue.pop(), Some(4));
        assert_eq!(queue.pop(), None);

        queue.push(5);
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.dropped_count(), 2);
    }

    #[test]
    fn pop_if_leaves_front_when_predicate_fails() {
        let queue = ThreadsafeQueue::new(4, true).unwrap();
        queue.push(5);
        queue.push(7);
        assert_eq!(queue.pop_if(|&x| x > 5), None);
        assert_eq!(queue.peek_front(), Some(5));
        assert_eq!(queue.pop_if(|&x| x == 5), Some(5));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn blocking_push_waits_for_consumer() {
        let queue = Arc::new(ThreadsafeQueue::new(1, false).unwrap());
        queue.push(1);

        let producer_queue = queue.clone();
        let producer = thread::spawn(move || {
            producer_queue.push(2);
        });

        thread::sleep(Duration::from_millis(20));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop(), Some(1));
        producer.join().unwrap();
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.dropped_count(), 0);
    }

    #[test]
    fn producer_and_consumer_preserve_fifo_order() {
        let queue = Arc::new(ThreadsafeQueue::new(16, false).unwrap());
        let producer_queue = queue.clone();
        let producer = thread::spawn(move || {
            for i in 0..1000u32 {
                producer_queue.push(i);
            }
        });

        let mut received = Vec::with_capacity(1000);
        while received.len() < 1000 {
            if let Some(v) = queue.pop_blocking_timeout(Duration::from_secs(5)) {
                received.push(v);
            } else {
                break;
            }
        }
        producer.join().unwrap();

        assert_eq!(received, (0..1000u32).collect::<Vec<u32>>());
    }

    #[test]
    fn blocking_pop_times_out_on_empty_queue() {
        let queue = ThreadsafeQueue::<u8>::new(2, true).unwrap();
        assert_eq!(queue.pop_blocking_timeout(Duration::from_millis(5)), None);
    }
}
