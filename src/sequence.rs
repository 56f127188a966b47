use std::fmt::{Display, Formatter};
use std::sync::Mutex;

/// A one-byte frame sequence number. Valid sequence numbers live in the configured
///  `[min_seq, max_seq]` range; zero is reserved as the 'unassigned' marker carried by
///  datagram frames, which is why configurations must use a `min_seq` of at least 1.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct SeqNum(u8);

impl Display for SeqNum {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl SeqNum {
    pub const UNASSIGNED: SeqNum = SeqNum(0);

    pub fn from_raw(value: u8) -> Self {
        Self(value)
    }

    pub fn to_raw(&self) -> u8 {
        self.0
    }

    pub fn is_in_range(&self, min_seq: u8, max_seq: u8) -> bool {
        self.0 >= min_seq && self.0 <= max_seq
    }

    /// The ack-slot row this sequence number lands in. Callers must not pass
    ///  `UNASSIGNED` - datagrams have no ack slot.
    pub fn slot_index(&self, window_size: usize) -> usize {
        (self.0 as usize - 1) % window_size
    }
}

/// Hands out sequence numbers for one direction of one link: read-increment with
///  wraparound from `max_seq` back to `min_seq`, atomic under a short critical section.
pub struct SeqCounter {
    min_seq: u8,
    max_seq: u8,
    next: Mutex<u8>,
}

impl SeqCounter {
    pub fn new(min_seq: u8, max_seq: u8) -> SeqCounter {
        SeqCounter {
            min_seq,
            max_seq,
            next: Mutex::new(min_seq),
        }
    }

    pub fn reserve_next(&self) -> SeqNum {
        let mut next = self.next.lock().unwrap();
        let reserved = *next;
        *next = if reserved == self.max_seq {
            self.min_seq
        } else {
            reserved + 1
        };
        SeqNum(reserved)
    }
}
