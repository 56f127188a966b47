use crate::frame::FrameControl;
use crate::message::Message;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use std::time::Duration;

/// Outcome of transmitting one complete frame. The engine never retries a send; a failed
///  frame is counted and the slot recycled.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SendOutcome {
    Sent,
    Failed,
}

/// Transport-level error codes for an inbound frame that could not be decoded. These are
///  treated as transient line noise: counted, never surfaced to the application.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum FrameErrorKind {
    ChecksumMismatch,
    PartialFrame,
    InvalidEncoding,
}

/// Outcome of one bounded receive attempt.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum RecvOutcome {
    Frame(FrameControl, Message),
    Timeout,
    FrameError(FrameErrorKind),
}

/// Blocking send/receive of one complete frame on a serial channel. The byte-level
///  layout (escaping, checksum, on-wire encoding) lives behind this trait; the engine
///  only sees frame control blocks and messages. Abstracted as a trait to allow mocking
///  the I/O part away for testing.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FrameTransport: Send + Sync + 'static {
    async fn send(&self, fcb: &FrameControl, message: &Message) -> SendOutcome;

    /// Waits up to `timeout` for one complete frame. Each attempt is bounded; overall
    ///  liveness of the reader depends on this returning control eventually.
    async fn recv(&self, timeout: Duration) -> RecvOutcome;
}
