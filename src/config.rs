use anyhow::bail;
use std::time::Duration;

/// Per-link configuration. Both link instances (board-to-board and remote console) are
///  built from the same engine; only the sizes and timeouts differ.
pub struct LinkConfig {
    /// slots available for outbound frames; `post`/`notify`/`transaction` fail once
    ///  these stay exhausted for the caller's timeout
    pub transmit_pool_size: usize,
    /// slots available for inbound frames; an exhausted receive pool stalls the reader,
    ///  not the peer
    pub receive_pool_size: usize,

    /// number of ack-slot rows, bounding concurrently outstanding transactions. Callers
    ///  exceeding this alias rows and corrupt reply correlation.
    pub window_size: usize,
    /// lowest valid sequence number; must be at least 1 (0 marks 'unassigned')
    pub min_seq: u8,
    /// highest valid sequence number; the counter wraps back to `min_seq` past it
    pub max_seq: u8,

    /// per-attempt bound on frame transport send/recv
    pub io_timeout: Duration,
    /// periodic wake of the reader and worker loops when idle
    pub poll_interval: Duration,
    /// default bound on waiting for a transaction's ack
    pub transaction_timeout: Duration,
    /// retransmit budget armed per transaction; see `AckTable` for why it is not
    ///  consumed today
    pub transaction_retries: u8,
}

impl LinkConfig {
    /// Defaults matching the observed serial-link timings: ~1s link I/O, 2s transactions,
    ///  a window of 8 and small symmetric pools.
    pub fn default_serial() -> LinkConfig {
        LinkConfig {
            transmit_pool_size: 16,
            receive_pool_size: 16,
            window_size: 8,
            min_seq: 1,
            max_seq: 255,
            io_timeout: Duration::from_millis(1000),
            poll_interval: Duration::from_millis(1000),
            transaction_timeout: Duration::from_millis(2000),
            transaction_retries: 5,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.transmit_pool_size == 0 || self.receive_pool_size == 0 {
            bail!("pool sizes must be at least 1");
        }
        if self.window_size == 0 {
            bail!("window size must be at least 1");
        }
        if self.min_seq == 0 {
            bail!("sequence number 0 is reserved for unsequenced frames");
        }
        if self.min_seq > self.max_seq {
            bail!("min_seq must not exceed max_seq");
        }
        let range_len = (self.max_seq - self.min_seq) as usize + 1;
        if self.window_size > range_len {
            bail!(
                "window size {} exceeds the sequence range of {} values",
                self.window_size,
                range_len
            );
        }
        Ok(())
    }
}
