use crate::frame::FrameControl;
use crate::message::Message;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, trace};

/// One reusable message slot: a frame control block plus its payload. At any instant a
///  slot belongs to exactly one of the pool's free list, a frame queue, or a caller that
///  checked it out - returning a slot it does not hold is a programmer error, not a
///  runtime-checked condition.
pub struct PoolSlot {
    pub fcb: FrameControl,
    pub message: Message,
}

impl PoolSlot {
    fn blank() -> PoolSlot {
        PoolSlot {
            fcb: FrameControl::datagram(false),
            message: Message::EMPTY,
        }
    }
}

/// Fixed-capacity pool of reusable message slots. All slots are created once at engine
///  initialization and recycled for the lifetime of the process; `acquire` is a bounded
///  wait on a counting semaphore, `release` returns the slot and wakes one waiter.
pub struct BufferPool {
    name: &'static str,
    capacity: usize,
    free: Mutex<Vec<Box<PoolSlot>>>,
    available: Semaphore,
}

impl BufferPool {
    pub fn new(name: &'static str, capacity: usize) -> BufferPool {
        let free = (0..capacity)
            .map(|_| Box::new(PoolSlot::blank()))
            .collect::<Vec<_>>();

        BufferPool {
            name,
            capacity,
            free: Mutex::new(free),
            available: Semaphore::new(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn free_count(&self) -> usize {
        self.free.lock().unwrap().len()
    }

    /// Checks out a slot, waiting up to `timeout` for one to become free. `None` means
    ///  the pool stayed exhausted for the whole timeout - the only failure mode.
    pub async fn acquire(&self, timeout: Duration) -> Option<Box<PoolSlot>> {
        match tokio::time::timeout(timeout, self.available.acquire()).await {
            Ok(Ok(permit)) => {
                permit.forget();
                let slot = self
                    .free
                    .lock()
                    .unwrap()
                    .pop()
                    .expect("this is a bug: semaphore permit granted without a free slot");
                trace!("pool {}: slot checked out", self.name);
                Some(slot)
            }
            Ok(Err(_)) => unreachable!("pool semaphore is never closed"),
            Err(_) => {
                debug!("pool {}: exhausted for {:?}, acquire failed", self.name, timeout);
                None
            }
        }
    }

    pub fn release(&self, slot: Box<PoolSlot>) {
        self.free.lock().unwrap().push(slot);
        self.available.add_permits(1);
        trace!("pool {}: slot returned", self.name);
    }
}
