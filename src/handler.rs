use crate::frame::FrameControl;
use crate::message::Message;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

/// Application callback for inbound fire-and-forget frames. The engine observes no return
///  value and sends no reply.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DatagramHandler: Send + Sync + 'static {
    async fn on_datagram(&self, message: &Message, fcb: &FrameControl);
}

/// Application callback for inbound ack-required frames. The returned reply is wrapped by
///  the engine in a message+ack frame echoing the request's sequence number.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TransactionHandler: Send + Sync + 'static {
    async fn on_transaction(&self, message: &Message, fcb: &FrameControl) -> Message;
}
