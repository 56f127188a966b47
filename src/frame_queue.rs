use crate::pool::PoolSlot;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::trace;

/// Priority-aware frame queue between an engine role and the pools. Priority-flagged
///  slots are serviced strictly before normal-class slots; within a class, FIFO order
///  holds. A priority slot is therefore inserted behind any priority slots already
///  queued, not at the absolute head.
pub struct FrameQueue {
    name: &'static str,
    queue: Mutex<VecDeque<Box<PoolSlot>>>,
    ready: Semaphore,
}

impl FrameQueue {
    pub fn new(name: &'static str) -> FrameQueue {
        FrameQueue {
            name,
            queue: Mutex::new(VecDeque::new()),
            ready: Semaphore::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push(&self, slot: Box<PoolSlot>) {
        {
            let mut queue = self.queue.lock().unwrap();
            if slot.fcb.is_priority() {
                let insert_at = queue.iter().take_while(|queued| queued.fcb.is_priority()).count();
                trace!("queue {}: priority frame inserted at position {}", self.name, insert_at);
                queue.insert(insert_at, slot);
            } else {
                queue.push_back(slot);
            }
        }
        self.ready.add_permits(1);
    }

    /// Removes the head of the queue, waiting up to `timeout` for work to arrive.
    pub async fn pop(&self, timeout: Duration) -> Option<Box<PoolSlot>> {
        match tokio::time::timeout(timeout, self.ready.acquire()).await {
            Ok(Ok(permit)) => {
                permit.forget();
                let slot = self
                    .queue
                    .lock()
                    .unwrap()
                    .pop_front()
                    .expect("this is a bug: queue permit granted without a queued slot");
                Some(slot)
            }
            Ok(Err(_)) => unreachable!("queue semaphore is never closed"),
            Err(_) => None,
        }
    }
}
