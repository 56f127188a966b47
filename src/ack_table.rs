use crate::message::Message;
use crate::sequence::SeqNum;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::warn;

struct AckSlotState {
    pending: bool,
    arrived: bool,
    sequence: SeqNum,
    /// Reserved budget for retransmitting an unacknowledged request. The delivery
    ///  contract is at-most-once-with-failure, so nothing consumes this today; the
    ///  reader's periodic wake is the structural hook if a retransmit policy is ever
    ///  added.
    retries_left: u8,
    reply: Message,
}

/// One row of the transaction window: pending/arrived bookkeeping plus the landing area
///  for the reply, with a dedicated wakeup signal so exactly one blocked caller is woken
///  when its ack arrives.
struct AckSlot {
    state: Mutex<AckSlotState>,
    arrived_signal: Notify,
}

impl AckSlot {
    fn new() -> AckSlot {
        AckSlot {
            state: Mutex::new(AckSlotState {
                pending: false,
                arrived: false,
                sequence: SeqNum::UNASSIGNED,
                retries_left: 0,
                reply: Message::EMPTY,
            }),
            arrived_signal: Notify::new(),
        }
    }
}

/// The window of ack slots for one link, indexed by `(sequence - 1) mod window_size`.
///
/// Each row is exclusively owned by at most one in-flight transaction; keeping the number
///  of concurrently outstanding transactions at or below the window size is the callers'
///  contract, not engine-enforced.
pub struct AckTable {
    link_name: &'static str,
    slots: Vec<AckSlot>,
}

impl AckTable {
    pub fn new(link_name: &'static str, window_size: usize) -> AckTable {
        AckTable {
            link_name,
            slots: (0..window_size).map(|_| AckSlot::new()).collect(),
        }
    }

    pub fn window_size(&self) -> usize {
        self.slots.len()
    }

    fn slot(&self, sequence: SeqNum) -> &AckSlot {
        &self.slots[sequence.slot_index(self.slots.len())]
    }

    /// Opens the row for `sequence`: marks it pending and arms the retry budget.
    pub fn open(&self, sequence: SeqNum, retries: u8) {
        let mut state = self.slot(sequence).state.lock().unwrap();
        if state.pending {
            warn!(
                "link {}: opening ack slot for sequence {} aliases still-pending sequence {} - too many concurrent transactions for the window",
                self.link_name, sequence, state.sequence
            );
        }
        *state = AckSlotState {
            pending: true,
            arrived: false,
            sequence,
            retries_left: retries,
            reply: Message::EMPTY,
        };
    }

    /// Closes the row without a reply (post failure or wait timeout); the row becomes
    ///  reusable immediately.
    pub fn close(&self, sequence: SeqNum) {
        let mut state = self.slot(sequence).state.lock().unwrap();
        state.pending = false;
        state.arrived = false;
    }

    /// Lands an inbound ack. Returns false when the row is not pending or was opened for
    ///  a different sequence number; such frames are stale or misdirected and the caller
    ///  drops them.
    pub fn complete(&self, acknak: SeqNum, reply: Message) -> bool {
        let slot = self.slot(acknak);
        {
            let mut state = slot.state.lock().unwrap();
            if !state.pending || state.sequence != acknak {
                return false;
            }
            state.reply = reply;
            state.arrived = true;
        }
        slot.arrived_signal.notify_one();
        true
    }

    /// Blocks the calling transaction until its reply lands or `timeout` elapses. Either
    ///  way the row is released before returning.
    pub async fn wait(&self, sequence: SeqNum, timeout: Duration) -> Option<Message> {
        let slot = self.slot(sequence);
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            let notified = slot.arrived_signal.notified();
            {
                let mut state = slot.state.lock().unwrap();
                if state.arrived && state.sequence == sequence {
                    state.pending = false;
                    state.arrived = false;
                    return Some(state.reply);
                }
            }
            // a stale notify permit from an earlier transaction on this row wakes us
            //  spuriously; the deadline-based re-check absorbs that
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                self.close(sequence);
                return None;
            }
        }
    }

    pub fn is_pending(&self, sequence: SeqNum) -> bool {
        self.slot(sequence).state.lock().unwrap().pending
    }

    pub fn retries_left(&self, sequence: SeqNum) -> u8 {
        self.slot(sequence).state.lock().unwrap().retries_left
    }
}
