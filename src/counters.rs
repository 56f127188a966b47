use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

/// Per-link diagnostic counters, shared by the three role loops. Relaxed ordering is
///  sufficient: the counters are advisory and never drive control flow.
#[derive(Default)]
pub struct LinkCounters {
    pub(crate) frames_sent: AtomicU64,
    pub(crate) send_errors: AtomicU64,
    pub(crate) frames_received: AtomicU64,
    pub(crate) receive_errors: AtomicU64,
    pub(crate) acks_matched: AtomicU64,
    pub(crate) acks_dropped: AtomicU64,
    pub(crate) datagrams_dispatched: AtomicU64,
    pub(crate) transactions_dispatched: AtomicU64,
    pub(crate) last_received_seq: AtomicU8,
}

impl LinkCounters {
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CountersSnapshot {
        CountersSnapshot {
            frames_sent: self.frames_sent.load(Ordering::Relaxed),
            send_errors: self.send_errors.load(Ordering::Relaxed),
            frames_received: self.frames_received.load(Ordering::Relaxed),
            receive_errors: self.receive_errors.load(Ordering::Relaxed),
            acks_matched: self.acks_matched.load(Ordering::Relaxed),
            acks_dropped: self.acks_dropped.load(Ordering::Relaxed),
            datagrams_dispatched: self.datagrams_dispatched.load(Ordering::Relaxed),
            transactions_dispatched: self.transactions_dispatched.load(Ordering::Relaxed),
            last_received_seq: self.last_received_seq.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of a link's counters.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct CountersSnapshot {
    pub frames_sent: u64,
    pub send_errors: u64,
    pub frames_received: u64,
    pub receive_errors: u64,
    pub acks_matched: u64,
    pub acks_dropped: u64,
    pub datagrams_dispatched: u64,
    pub transactions_dispatched: u64,
    /// raw sequence number of the most recent inbound frame, 0 before the first one
    pub last_received_seq: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_bumps() {
        let counters = LinkCounters::default();
        LinkCounters::bump(&counters.frames_sent);
        LinkCounters::bump(&counters.frames_sent);
        LinkCounters::bump(&counters.acks_dropped);

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.frames_sent, 2);
        assert_eq!(snapshot.acks_dropped, 1);
        assert_eq!(snapshot.frames_received, 0);
    }
}
