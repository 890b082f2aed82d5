use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

/// Unbounded FIFO queue shareable between threads, with explicit shutdown.
///
/// `push` never blocks. `recv` blocks until an item is available or the
/// queue has been closed; after `close`, pending items remain drainable and
/// `recv` returns `None` once the queue is empty. Closing is idempotent and
/// wakes every blocked receiver.
#[derive(Debug)]
pub struct ClosableQueue<T> {
    state: Mutex<State<T>>,
    ready: Condvar,
}

#[derive(Debug)]
struct State<T> {
    items: VecDeque<T>,
    closed: bool,
}

impl<T> Default for ClosableQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ClosableQueue<T> {
    /// Creates an empty, open queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                items: VecDeque::new(),
                closed: false,
            }),
            ready: Condvar::new(),
        }
    }

    /// Appends one item and wakes one receiver.
    ///
    /// Callers uphold the shutdown protocol: no push happens after `close`.
    pub fn push(&self, item: T) {
        {
            let mut state = self.state.lock().expect("queue mutex poisoned");
            debug_assert!(!state.closed, "push after close");
            state.items.push_back(item);
        }
        self.ready.notify_one();
    }

    /// Removes the oldest item, blocking while the queue is open and empty.
    ///
    /// Returns `None` once the queue is closed and drained.
    pub fn recv(&self) -> Option<T> {
        let mut state = self.state.lock().expect("queue mutex poisoned");
        loop {
            if let Some(item) = state.items.pop_front() {
                return Some(item);
            }
            if state.closed {
                return None;
            }
            state = self.ready.wait(state).expect("queue mutex poisoned");
        }
    }

    /// Closes the queue and wakes all blocked receivers. Idempotent.
    pub fn close(&self) {
        {
            let mut state = self.state.lock().expect("queue mutex poisoned");
            if state.closed {
                return;
            }
            state.closed = true;
        }
        self.ready.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn push_then_recv_is_fifo() {
        let queue = ClosableQueue::new();
        queue.push(1);
        queue.push(2);
        queue.push(3);
        assert_eq!(queue.recv(), Some(1));
        assert_eq!(queue.recv(), Some(2));
        assert_eq!(queue.recv(), Some(3));
    }

    #[test]
    fn close_drains_pending_items_first() {
        let queue = ClosableQueue::new();
        queue.push("a");
        queue.close();
        assert_eq!(queue.recv(), Some("a"));
        assert_eq!(queue.recv(), None);
        // recv keeps answering None after the drain.
        assert_eq!(queue.recv(), None);
    }

    #[test]
    fn close_is_idempotent() {
        let queue: ClosableQueue<u8> = ClosableQueue::new();
        queue.close();
        queue.close();
        assert_eq!(queue.recv(), None);
    }

    #[test]
    fn recv_blocks_until_push() {
        let queue = Arc::new(ClosableQueue::new());
        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                queue.push(42);
            })
        };
        assert_eq!(queue.recv(), Some(42));
        producer.join().expect("producer join");
    }

    #[test]
    fn close_wakes_all_blocked_receivers() {
        let queue: Arc<ClosableQueue<u8>> = Arc::new(ClosableQueue::new());
        let receivers: Vec<_> = (0..4)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || queue.recv())
            })
            .collect();
        thread::sleep(Duration::from_millis(20));
        queue.close();
        for receiver in receivers {
            assert_eq!(receiver.join().expect("receiver join"), None);
        }
    }

    #[test]
    fn many_producers_one_consumer() {
        let queue = Arc::new(ClosableQueue::new());
        let producers: Vec<_> = (0..4)
            .map(|base| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    for i in 0..100 {
                        queue.push(base * 100 + i);
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.join().expect("producer join");
        }
        queue.close();

        let mut seen = Vec::new();
        while let Some(item) = queue.recv() {
            seen.push(item);
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..400).collect::<Vec<_>>());
    }
}
