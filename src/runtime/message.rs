//! Fixed-capacity message and mailbox ring.
//!
//! Messages are value-copied into mailboxes. There is no shared
//! ownership or aliasing of a sender's buffer, matching the original's
//! `memcpy`-into-slot design. A mailbox is a classic ring buffer with
//! one slot permanently reserved so that `head == tail` means "empty"
//! unambiguously.

use crate::limits::{MAIL_MAX, MSG_MAX};
use crate::types::{Pid, Word};

/// A single message: who sent it, how many of `data`'s words are
/// meaningful, and the words themselves.
#[derive(Debug, Clone, Copy)]
pub struct Message {
    pub from: Pid,
    pub len: usize,
    pub data: [Word; MSG_MAX],
}

impl Message {
    pub fn new(from: Pid, data: &[Word]) -> Self {
        let mut buf = [0; MSG_MAX];
        buf[..data.len()].copy_from_slice(data);
        Message {
            from,
            len: data.len(),
            data: buf,
        }
    }
}

/// Outcome of an `enqueue` attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueError {
    /// The ring has no free slot (the reserved-slot invariant would be
    /// violated).
    Full,
}

/// A bounded ring of messages. Capacity is `MAIL_MAX - 1`: one slot is
/// reserved so `head == tail` always means empty, never full.
pub struct Mailbox {
    slots: Box<[Message; MAIL_MAX]>,
    head: usize,
    tail: usize,
}

impl Mailbox {
    pub fn new() -> Self {
        Mailbox {
            slots: Box::new(
                [Message {
                    from: Pid::NONE,
                    len: 0,
                    data: [0; MSG_MAX],
                }; MAIL_MAX],
            ),
            head: 0,
            tail: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Number of messages currently stored.
    pub fn len(&self) -> usize {
        (self.tail + MAIL_MAX - self.head) % MAIL_MAX
    }

    /// Append a message to the tail. Fails `Full` without mutating
    /// anything if the ring has no spare slot.
    pub fn enqueue(&mut self, msg: Message) -> Result<(), EnqueueError> {
        let next_tail = (self.tail + 1) % MAIL_MAX;
        if next_tail == self.head {
            return Err(EnqueueError::Full);
        }
        self.slots[self.tail] = msg;
        self.tail = next_tail;
        Ok(())
    }

    /// Remove and return the oldest message, or `None` if empty.
    pub fn dequeue(&mut self) -> Option<Message> {
        if self.is_empty() {
            return None;
        }
        let msg = self.slots[self.head];
        self.head = (self.head + 1) % MAIL_MAX;
        Some(msg)
    }
}

impl Default for Mailbox {
    fn default() -> Self {
        Mailbox::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mailbox_dequeues_none() {
        let mut mb = Mailbox::new();
        assert!(mb.is_empty());
        assert!(mb.dequeue().is_none());
    }

    #[test]
    fn fifo_order_preserved() {
        let mut mb = Mailbox::new();
        mb.enqueue(Message::new(Pid(1), &[1, 2])).unwrap();
        mb.enqueue(Message::new(Pid(2), &[3])).unwrap();
        let first = mb.dequeue().unwrap();
        assert_eq!(first.from, Pid(1));
        assert_eq!(&first.data[..first.len], &[1, 2]);
        let second = mb.dequeue().unwrap();
        assert_eq!(second.from, Pid(2));
    }

    #[test]
    fn fills_and_reports_full() {
        let mut mb = Mailbox::new();
        for i in 0..(MAIL_MAX - 1) {
            mb.enqueue(Message::new(Pid(i as i32), &[])).unwrap();
        }
        assert_eq!(mb.enqueue(Message::new(Pid::NONE, &[])), Err(EnqueueError::Full));
    }

    #[test]
    fn wraps_around_ring() {
        let mut mb = Mailbox::new();
        for i in 0..(MAIL_MAX - 1) {
            mb.enqueue(Message::new(Pid(i as i32), &[])).unwrap();
        }
        for _ in 0..(MAIL_MAX / 2) {
            mb.dequeue().unwrap();
        }
        for i in 0..(MAIL_MAX / 2) {
            mb.enqueue(Message::new(Pid(100 + i as i32), &[])).unwrap();
        }
        assert_eq!(mb.len(), MAIL_MAX - 1);
    }
}
