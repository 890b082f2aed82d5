//! One-shot completion channel between pipeline workers.
//!
//! Each walker emission in threaded mode creates one channel: the sender half
//! travels with the comparison job, the receiver half queues at the report
//! worker in emission order. Whichever side finishes first, the report worker
//! observes values in the order the walker produced them.

use std::sync::{Arc, Condvar, Mutex};

#[derive(Debug)]
struct Slot<T> {
    value: Mutex<Completion<T>>,
    ready: Condvar,
}

#[derive(Debug)]
enum Completion<T> {
    Pending,
    Done(T),
    Abandoned,
}

/// Producer half: fulfills the slot exactly once.
#[derive(Debug)]
pub(crate) struct Sender<T> {
    slot: Arc<Slot<T>>,
    sent: bool,
}

/// Consumer half: blocks until the slot is fulfilled or abandoned.
#[derive(Debug)]
pub(crate) struct Receiver<T> {
    slot: Arc<Slot<T>>,
}

/// Creates a connected sender/receiver pair.
pub(crate) fn channel<T>() -> (Sender<T>, Receiver<T>) {
    let slot = Arc::new(Slot {
        value: Mutex::new(Completion::Pending),
        ready: Condvar::new(),
    });
    (
        Sender {
            slot: Arc::clone(&slot),
            sent: false,
        },
        Receiver { slot },
    )
}

impl<T> Sender<T> {
    /// Publishes `value` and wakes the receiver.
    pub(crate) fn send(mut self, value: T) {
        *self.slot.value.lock().expect("slot mutex poisoned") = Completion::Done(value);
        self.sent = true;
        self.slot.ready.notify_one();
    }
}

impl<T> Drop for Sender<T> {
    fn drop(&mut self) {
        if self.sent {
            return;
        }
        // A sender dropped without sending must still wake the receiver.
        *self.slot.value.lock().expect("slot mutex poisoned") = Completion::Abandoned;
        self.slot.ready.notify_one();
    }
}

impl<T> Receiver<T> {
    /// Blocks until the value arrives; `None` when the sender was dropped
    /// without sending.
    pub(crate) fn recv(self) -> Option<T> {
        let mut guard = self.slot.value.lock().expect("slot mutex poisoned");
        loop {
            match std::mem::replace(&mut *guard, Completion::Pending) {
                Completion::Done(value) => return Some(value),
                Completion::Abandoned => return None,
                Completion::Pending => {
                    guard = self.slot.ready.wait(guard).expect("slot mutex poisoned");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn value_sent_before_recv_is_observed() {
        let (tx, rx) = channel();
        tx.send(7);
        assert_eq!(rx.recv(), Some(7));
    }

    #[test]
    fn recv_blocks_until_send() {
        let (tx, rx) = channel();
        let sender = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            tx.send("late");
        });
        assert_eq!(rx.recv(), Some("late"));
        sender.join().expect("sender join");
    }

    #[test]
    fn dropped_sender_unblocks_receiver() {
        let (tx, rx) = channel::<u8>();
        let dropper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            drop(tx);
        });
        assert_eq!(rx.recv(), None);
        dropper.join().expect("dropper join");
    }

    #[test]
    fn dropped_receiver_does_not_block_send() {
        let (tx, rx) = channel();
        drop(rx);
        tx.send(1);
    }
}
