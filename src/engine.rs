use crate::ack_table::AckTable;
use crate::config::LinkConfig;
use crate::counters::{CountersSnapshot, LinkCounters};
use crate::frame::{FrameControl, FrameFlags, FrameKind};
use crate::frame_queue::FrameQueue;
use crate::frame_transport::{FrameTransport, RecvOutcome, SendOutcome};
use crate::handler::{DatagramHandler, TransactionHandler};
use crate::message::Message;
use crate::pool::{BufferPool, PoolSlot};
use crate::sequence::SeqCounter;
use anyhow::bail;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

/// LinkEngine is the place where all other parts of the protocol come together: it owns
///  one link's pools, queues, ack window and counters, runs the three role loops against
///  the frame transport, and has the `notify`/`transaction` API for application code.
///
/// Engines share no state; a process runs one engine per link (board-to-board, remote
///  console) over the same generic machinery.
pub struct LinkEngine {
    link_name: &'static str,
    config: LinkConfig,

    transmit_pool: BufferPool,
    receive_pool: BufferPool,
    transmit_queue: FrameQueue,
    receive_queue: FrameQueue,
    ack_table: AckTable,
    seq_counter: SeqCounter,
    counters: LinkCounters,

    transport: Arc<dyn FrameTransport>,
    datagram_handler: Arc<dyn DatagramHandler>,
    transaction_handler: Arc<dyn TransactionHandler>,
}

/// Join handles for one engine's spawned role loops. The loops run forever; `abort` is
///  how a host process or test tears an engine down.
pub struct RoleHandles {
    pub reader: JoinHandle<()>,
    pub writer: JoinHandle<()>,
    pub worker: JoinHandle<()>,
}

impl RoleHandles {
    pub fn abort(&self) {
        self.reader.abort();
        self.writer.abort();
        self.worker.abort();
    }
}

impl LinkEngine {
    pub fn new(
        link_name: &'static str,
        config: LinkConfig,
        transport: Arc<dyn FrameTransport>,
        datagram_handler: Arc<dyn DatagramHandler>,
        transaction_handler: Arc<dyn TransactionHandler>,
    ) -> anyhow::Result<Arc<LinkEngine>> {
        config.validate()?;

        Ok(Arc::new(LinkEngine {
            link_name,
            transmit_pool: BufferPool::new("transmit", config.transmit_pool_size),
            receive_pool: BufferPool::new("receive", config.receive_pool_size),
            transmit_queue: FrameQueue::new("transmit"),
            receive_queue: FrameQueue::new("receive"),
            ack_table: AckTable::new(link_name, config.window_size),
            seq_counter: SeqCounter::new(config.min_seq, config.max_seq),
            counters: LinkCounters::default(),
            config,
            transport,
            datagram_handler,
            transaction_handler,
        }))
    }

    pub fn link_name(&self) -> &'static str {
        self.link_name
    }

    pub fn counters(&self) -> CountersSnapshot {
        self.counters.snapshot()
    }

    /// Spawns the reader, writer and worker loops as independent tasks sharing this
    ///  engine.
    pub fn spawn_role_loops(self: &Arc<Self>) -> RoleHandles {
        let reader = tokio::spawn({
            let engine = self.clone();
            async move { engine.reader_loop().await }
        });
        let writer = tokio::spawn({
            let engine = self.clone();
            async move { engine.writer_loop().await }
        });
        let worker = tokio::spawn({
            let engine = self.clone();
            async move { engine.worker_loop().await }
        });
        RoleHandles { reader, writer, worker }
    }

    /// Queues an outbound frame: checks a slot out of the transmit pool, fills it and
    ///  hands it to the writer. Fails only if the pool stays exhausted for `timeout`.
    pub async fn post(&self, fcb: FrameControl, message: Message, timeout: Duration) -> anyhow::Result<()> {
        let Some(mut slot) = self.transmit_pool.acquire(timeout).await else {
            bail!("link {}: transmit pool exhausted for {:?}", self.link_name, timeout);
        };
        slot.fcb = fcb;
        slot.message = message;
        self.transmit_queue.push(slot);
        Ok(())
    }

    /// Removes the next inbound frame from the receive queue, waiting up to `timeout`.
    ///  The slot must be handed back via [`release_received`](Self::release_received)
    ///  once the payload is consumed.
    pub async fn pend(&self, timeout: Duration) -> Option<Box<PoolSlot>> {
        self.receive_queue.pop(timeout).await
    }

    pub fn release_received(&self, slot: Box<PoolSlot>) {
        self.receive_pool.release(slot);
    }

    /// Fire-and-forget: queues `message` as a datagram frame. Success means queued, not
    ///  delivered - there is no wait for transmission or any reply.
    pub async fn notify(&self, message: Message, timeout: Duration) -> anyhow::Result<()> {
        self.post(FrameControl::datagram(false), message, timeout).await
    }

    /// Request/reply: reserves the next sequence number, opens its ack slot, queues the
    ///  request as an ack-required frame and blocks until the matching reply lands or
    ///  `timeout` elapses.
    ///
    /// Delivery contract is at-most-once-with-failure: a transaction that never sees its
    ///  ack fails after `timeout`, nothing is retransmitted. Callers must keep the number
    ///  of concurrently outstanding transactions within the configured window size.
    pub async fn transaction(&self, request: Message, timeout: Duration) -> anyhow::Result<Message> {
        let seq = self.seq_counter.reserve_next();
        self.ack_table.open(seq, self.config.transaction_retries);
        trace!("link {}: transaction opened with sequence {}", self.link_name, seq);

        if let Err(e) = self.post(FrameControl::request(seq), request, timeout).await {
            self.ack_table.close(seq);
            return Err(e);
        }

        match self.ack_table.wait(seq, timeout).await {
            Some(reply) => Ok(reply),
            None => bail!(
                "link {}: transaction {} saw no ack within {:?}",
                self.link_name,
                seq,
                timeout
            ),
        }
    }

    /// Drains the transmit queue to the frame transport. Send failures are counted, the
    ///  slot is recycled either way, and nothing is retried - retransmission, if ever
    ///  wanted, is a transaction-layer concern.
    pub async fn writer_loop(&self) {
        info!("link {}: starting writer loop", self.link_name);
        loop {
            let Some(slot) = self.transmit_queue.pop(self.config.poll_interval).await else {
                continue;
            };
            match self.transport.send(&slot.fcb, &slot.message).await {
                SendOutcome::Sent => {
                    trace!("link {}: sent frame {:?}", self.link_name, slot.fcb);
                    LinkCounters::bump(&self.counters.frames_sent);
                }
                SendOutcome::Failed => {
                    debug!("link {}: frame transport send failed for {:?}", self.link_name, slot.fcb);
                    LinkCounters::bump(&self.counters.send_errors);
                }
            }
            self.transmit_pool.release(slot);
        }
    }

    /// Pulls inbound frames from the frame transport into pool-backed slots. A reserved
    ///  slot is kept across transport errors: checksum mismatches and timeouts are line
    ///  noise, counted and retried with the same slot until a good frame arrives.
    pub async fn reader_loop(&self) {
        info!("link {}: starting reader loop", self.link_name);
        loop {
            let Some(mut slot) = self.receive_pool.acquire(self.config.poll_interval).await else {
                // periodic wake with no free slot; this is also where retransmit
                //  housekeeping for unacknowledged transactions would hook in
                continue;
            };

            loop {
                match self.transport.recv(self.config.io_timeout).await {
                    RecvOutcome::Frame(fcb, message) => {
                        trace!("link {}: received frame {:?}", self.link_name, fcb);
                        slot.fcb = fcb;
                        slot.message = message;
                        LinkCounters::bump(&self.counters.frames_received);
                        self.counters
                            .last_received_seq
                            .store(fcb.sequence.to_raw(), std::sync::atomic::Ordering::Relaxed);
                        self.receive_queue.push(slot);
                        break;
                    }
                    RecvOutcome::Timeout => {
                        trace!("link {}: receive timeout, retrying", self.link_name);
                    }
                    RecvOutcome::FrameError(kind) => {
                        debug!("link {}: frame error {:?}, retrying", self.link_name, kind);
                        LinkCounters::bump(&self.counters.receive_errors);
                    }
                }
            }
        }
    }

    /// Classifies received frames: datagrams go to the datagram handler, ack-required
    ///  requests to the transaction handler (with the reply auto-wrapped in a
    ///  message+ack frame), and inbound acks to the ack window.
    pub async fn worker_loop(&self) {
        info!("link {}: starting worker loop", self.link_name);
        loop {
            let Some(slot) = self.pend(self.config.poll_interval).await else {
                continue;
            };
            self.dispatch(slot).await;
        }
    }

    async fn dispatch(&self, slot: Box<PoolSlot>) {
        match slot.fcb.kind {
            FrameKind::MessageOnly if slot.fcb.flags.contains(FrameFlags::DATAGRAM) => {
                self.datagram_handler.on_datagram(&slot.message, &slot.fcb).await;
                LinkCounters::bump(&self.counters.datagrams_dispatched);
            }
            FrameKind::MessageOnly if slot.fcb.flags.contains(FrameFlags::ACK_REQUIRED) => {
                let reply = self.transaction_handler.on_transaction(&slot.message, &slot.fcb).await;
                LinkCounters::bump(&self.counters.transactions_dispatched);

                let reply_fcb = FrameControl::reply(slot.fcb.sequence);
                if let Err(e) = self.post(reply_fcb, reply, self.config.io_timeout).await {
                    warn!(
                        "link {}: could not queue ack for sequence {}: {}",
                        self.link_name, slot.fcb.sequence, e
                    );
                    LinkCounters::bump(&self.counters.send_errors);
                }
            }
            FrameKind::MessageOnly => {
                debug!(
                    "link {}: message-only frame with neither datagram nor ack-required flag, dropping",
                    self.link_name
                );
            }
            FrameKind::MessageAck => self.on_ack(&slot),
        }
        self.release_received(slot);
    }

    fn on_ack(&self, slot: &PoolSlot) {
        let acknak = slot.fcb.acknak;
        if !acknak.is_in_range(self.config.min_seq, self.config.max_seq) {
            warn!(
                "link {}: ack with out-of-range acknak {}, dropping",
                self.link_name, acknak
            );
            LinkCounters::bump(&self.counters.acks_dropped);
            return;
        }

        if self.ack_table.complete(acknak, slot.message) {
            trace!("link {}: ack {} matched its pending transaction", self.link_name, acknak);
            LinkCounters::bump(&self.counters.acks_matched);
        } else {
            warn!(
                "link {}: ack {} does not match a pending transaction, dropping",
                self.link_name, acknak
            );
            LinkCounters::bump(&self.counters.acks_dropped);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_transport::FrameErrorKind;
    use crate::message::Param;
    use crate::sequence::SeqNum;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    /// Transport double driven by channels: frames the engine sends land on `outbound`,
    ///  and the test scripts the reader's receive outcomes through `inbound`.
    struct ScriptedTransport {
        outbound: mpsc::UnboundedSender<(FrameControl, Message)>,
        inbound: tokio::sync::Mutex<mpsc::UnboundedReceiver<RecvOutcome>>,
    }

    #[async_trait]
    impl FrameTransport for ScriptedTransport {
        async fn send(&self, fcb: &FrameControl, message: &Message) -> SendOutcome {
            self.outbound.send((*fcb, *message)).ok();
            SendOutcome::Sent
        }

        async fn recv(&self, timeout: Duration) -> RecvOutcome {
            let mut inbound = self.inbound.lock().await;
            match tokio::time::timeout(timeout, inbound.recv()).await {
                Ok(Some(outcome)) => outcome,
                Ok(None) => {
                    // script finished; behave like an idle line
                    tokio::time::sleep(timeout).await;
                    RecvOutcome::Timeout
                }
                Err(_) => RecvOutcome::Timeout,
            }
        }
    }

    struct NoopDatagramHandler;

    #[async_trait]
    impl DatagramHandler for NoopDatagramHandler {
        async fn on_datagram(&self, _message: &Message, _fcb: &FrameControl) {}
    }

    struct RecordingDatagramHandler {
        seen: Mutex<Vec<Message>>,
    }

    #[async_trait]
    impl DatagramHandler for RecordingDatagramHandler {
        async fn on_datagram(&self, message: &Message, _fcb: &FrameControl) {
            self.seen.lock().unwrap().push(*message);
        }
    }

    /// Replies with the request's params and the opcode's reply bit set.
    struct EchoTransactionHandler;

    #[async_trait]
    impl TransactionHandler for EchoTransactionHandler {
        async fn on_transaction(&self, message: &Message, _fcb: &FrameControl) -> Message {
            Message::new(message.opcode | 0x8000, message.param1, message.param2)
        }
    }

    struct TestLink {
        engine: Arc<LinkEngine>,
        outbound: mpsc::UnboundedReceiver<(FrameControl, Message)>,
        inbound: mpsc::UnboundedSender<RecvOutcome>,
    }

    fn test_link(config: LinkConfig, datagram_handler: Arc<dyn DatagramHandler>) -> TestLink {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

        let transport = Arc::new(ScriptedTransport {
            outbound: outbound_tx,
            inbound: tokio::sync::Mutex::new(inbound_rx),
        });

        let engine = LinkEngine::new(
            "test",
            config,
            transport,
            datagram_handler,
            Arc::new(EchoTransactionHandler),
        )
        .unwrap();

        TestLink {
            engine,
            outbound: outbound_rx,
            inbound: inbound_tx,
        }
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !condition() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("condition not reached in time");
    }

    fn message(payload: u32) -> Message {
        Message::new(0x10, Param::from_u32(payload), Param::ZERO)
    }

    #[tokio::test]
    async fn test_permuted_acks_resolve_each_transaction() {
        let mut link = test_link(LinkConfig::default_serial(), Arc::new(NoopDatagramHandler));
        let roles = link.engine.spawn_role_loops();

        let mut callers = Vec::new();
        for i in 0u32..8 {
            callers.push(tokio::spawn({
                let engine = link.engine.clone();
                async move { engine.transaction(message(i), Duration::from_secs(5)).await }
            }));
        }

        // collect the eight requests off the wire and map payload -> assigned sequence
        let mut seq_of_payload = [SeqNum::UNASSIGNED; 8];
        for _ in 0..8 {
            let (fcb, msg) = tokio::time::timeout(Duration::from_secs(5), link.outbound.recv())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(fcb.kind, FrameKind::MessageOnly);
            assert!(fcb.flags.contains(FrameFlags::ACK_REQUIRED));
            seq_of_payload[msg.param1.as_u32() as usize] = fcb.sequence;
        }

        // deliver the acks in a permuted order, each carrying its own payload back
        for i in [5u32, 2, 7, 0, 6, 1, 4, 3] {
            let reply = Message::new(0x8010, Param::from_u32(i), Param::ZERO);
            link.inbound
                .send(RecvOutcome::Frame(
                    FrameControl::reply(seq_of_payload[i as usize]),
                    reply,
                ))
                .unwrap();
        }

        for (i, caller) in callers.into_iter().enumerate() {
            let reply = caller.await.unwrap().unwrap();
            assert_eq!(reply.param1.as_u32(), i as u32);
        }

        assert_eq!(link.engine.counters().acks_matched, 8);
        assert_eq!(link.engine.counters().acks_dropped, 0);
        roles.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_transaction_timeout_releases_slot() {
        // no role loops: the request stays queued and no ack ever arrives
        let link = test_link(LinkConfig::default_serial(), Arc::new(NoopDatagramHandler));

        let before = tokio::time::Instant::now();
        let result = link
            .engine
            .transaction(message(1), Duration::from_millis(2000))
            .await;

        assert!(result.is_err());
        assert_eq!(before.elapsed(), Duration::from_millis(2000));

        // the first transaction reserved min_seq; its slot is reusable again
        assert!(!link.engine.ack_table.is_pending(SeqNum::from_raw(1)));
    }

    #[tokio::test]
    async fn test_notify_succeeds_without_roles() {
        let link = test_link(LinkConfig::default_serial(), Arc::new(NoopDatagramHandler));

        link.engine
            .notify(message(3), Duration::from_millis(100))
            .await
            .unwrap();

        // queued, not delivered: no worker or writer is running
        assert_eq!(link.engine.transmit_queue.len(), 1);
        assert_eq!(link.engine.counters().frames_sent, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_notify_fails_on_pool_exhaustion() {
        let mut config = LinkConfig::default_serial();
        config.transmit_pool_size = 2;
        let link = test_link(config, Arc::new(NoopDatagramHandler));

        link.engine.notify(message(1), Duration::from_millis(100)).await.unwrap();
        link.engine.notify(message(2), Duration::from_millis(100)).await.unwrap();

        let before = tokio::time::Instant::now();
        let result = link.engine.notify(message(3), Duration::from_millis(100)).await;
        assert!(result.is_err());
        assert_eq!(before.elapsed(), Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_reader_keeps_slot_across_frame_errors() {
        let handler = Arc::new(RecordingDatagramHandler { seen: Mutex::new(Vec::new()) });
        let link = test_link(LinkConfig::default_serial(), handler.clone());
        let roles = link.engine.spawn_role_loops();

        link.inbound
            .send(RecvOutcome::FrameError(FrameErrorKind::ChecksumMismatch))
            .unwrap();
        link.inbound
            .send(RecvOutcome::FrameError(FrameErrorKind::PartialFrame))
            .unwrap();
        link.inbound
            .send(RecvOutcome::Frame(FrameControl::datagram(false), message(42)))
            .unwrap();

        wait_until(|| link.engine.counters().datagrams_dispatched == 1).await;

        let snapshot = link.engine.counters();
        assert_eq!(snapshot.receive_errors, 2);
        assert_eq!(snapshot.frames_received, 1);
        assert_eq!(handler.seen.lock().unwrap().as_slice(), &[message(42)]);

        // pool conservation: the dispatched slot made it back to the receive pool
        wait_until(|| link.engine.receive_pool.free_count() + 1 == link.engine.receive_pool.capacity()).await;
        roles.abort();
    }

    #[tokio::test]
    async fn test_worker_auto_acks_requests() {
        let mut link = test_link(LinkConfig::default_serial(), Arc::new(NoopDatagramHandler));
        let roles = link.engine.spawn_role_loops();

        let request = Message::new(0x21, Param::from_u32(7), Param::from_u32(9));
        link.inbound
            .send(RecvOutcome::Frame(FrameControl::request(SeqNum::from_raw(7)), request))
            .unwrap();

        let (fcb, reply) = tokio::time::timeout(Duration::from_secs(5), link.outbound.recv())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(fcb.kind, FrameKind::MessageAck);
        assert_eq!(fcb.acknak, SeqNum::from_raw(7));
        assert_eq!(reply.opcode, 0x8021);
        assert_eq!(reply.param1.as_u32(), 7);
        assert_eq!(link.engine.counters().transactions_dispatched, 1);
        roles.abort();
    }

    #[tokio::test]
    async fn test_out_of_range_acknak_is_dropped() {
        let link = test_link(LinkConfig::default_serial(), Arc::new(NoopDatagramHandler));
        let roles = link.engine.spawn_role_loops();

        link.inbound
            .send(RecvOutcome::Frame(
                FrameControl::reply(SeqNum::UNASSIGNED),
                message(1),
            ))
            .unwrap();

        wait_until(|| link.engine.counters().acks_dropped == 1).await;
        assert_eq!(link.engine.counters().acks_matched, 0);
        roles.abort();
    }

    #[tokio::test]
    async fn test_unmatched_ack_is_dropped() {
        let link = test_link(LinkConfig::default_serial(), Arc::new(NoopDatagramHandler));
        let roles = link.engine.spawn_role_loops();

        // valid range, but no transaction is pending on that row
        link.inbound
            .send(RecvOutcome::Frame(
                FrameControl::reply(SeqNum::from_raw(3)),
                message(1),
            ))
            .unwrap();

        wait_until(|| link.engine.counters().acks_dropped == 1).await;
        assert_eq!(link.engine.counters().acks_matched, 0);
        roles.abort();
    }

    #[tokio::test]
    async fn test_priority_notification_overtakes_bulk() {
        let mut link = test_link(LinkConfig::default_serial(), Arc::new(NoopDatagramHandler));

        // queue bulk traffic first, then a latency-sensitive priority datagram
        link.engine
            .post(FrameControl::datagram(false), message(1), Duration::from_millis(100))
            .await
            .unwrap();
        link.engine
            .post(FrameControl::datagram(true), message(2), Duration::from_millis(100))
            .await
            .unwrap();

        let roles = link.engine.spawn_role_loops();

        let (_, first) = tokio::time::timeout(Duration::from_secs(5), link.outbound.recv())
            .await
            .unwrap()
            .unwrap();
        let (_, second) = tokio::time::timeout(Duration::from_secs(5), link.outbound.recv())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(first.param1.as_u32(), 2);
        assert_eq!(second.param1.as_u32(), 1);
        roles.abort();
    }

    #[tokio::test]
    async fn test_last_received_sequence_is_tracked() {
        let link = test_link(LinkConfig::default_serial(), Arc::new(NoopDatagramHandler));
        let roles = link.engine.spawn_role_loops();

        let request = Message::new(0x21, Param::ZERO, Param::ZERO);
        link.inbound
            .send(RecvOutcome::Frame(FrameControl::request(SeqNum::from_raw(9)), request))
            .unwrap();

        wait_until(|| link.engine.counters().last_received_seq == 9).await;
        roles.abort();
    }

    #[tokio::test]
    async fn test_writer_recycles_slot_after_send() {
        use crate::frame_transport::MockFrameTransport;
        use crate::handler::{MockDatagramHandler, MockTransactionHandler};

        let mut transport = MockFrameTransport::new();
        transport
            .expect_send()
            .withf(|fcb, msg| fcb.flags.contains(FrameFlags::DATAGRAM) && msg.param1.as_u32() == 5)
            .times(1)
            .returning(|_, _| SendOutcome::Sent);

        let engine = LinkEngine::new(
            "test",
            LinkConfig::default_serial(),
            Arc::new(transport),
            Arc::new(MockDatagramHandler::new()),
            Arc::new(MockTransactionHandler::new()),
        )
        .unwrap();

        engine.notify(message(5), Duration::from_millis(100)).await.unwrap();

        // only the writer runs; the mock verifies the frame reached the transport
        let writer = tokio::spawn({
            let engine = engine.clone();
            async move { engine.writer_loop().await }
        });

        wait_until(|| engine.counters().frames_sent == 1).await;
        assert_eq!(engine.transmit_pool.free_count(), engine.transmit_pool.capacity());
        writer.abort();
    }

    #[tokio::test]
    async fn test_writer_counts_send_failures() {
        use crate::frame_transport::MockFrameTransport;
        use crate::handler::{MockDatagramHandler, MockTransactionHandler};

        let mut transport = MockFrameTransport::new();
        transport.expect_send().times(1).returning(|_, _| SendOutcome::Failed);

        let engine = LinkEngine::new(
            "test",
            LinkConfig::default_serial(),
            Arc::new(transport),
            Arc::new(MockDatagramHandler::new()),
            Arc::new(MockTransactionHandler::new()),
        )
        .unwrap();

        engine.notify(message(1), Duration::from_millis(100)).await.unwrap();

        let writer = tokio::spawn({
            let engine = engine.clone();
            async move { engine.writer_loop().await }
        });

        wait_until(|| engine.counters().send_errors == 1).await;
        assert_eq!(engine.counters().frames_sent, 0);
        // the slot is recycled even though the send failed
        assert_eq!(engine.transmit_pool.free_count(), engine.transmit_pool.capacity());
        writer.abort();
    }

    #[tokio::test]
    async fn test_two_engines_share_nothing() {
        let link_a = test_link(LinkConfig::default_serial(), Arc::new(NoopDatagramHandler));
        let link_b = test_link(LinkConfig::default_serial(), Arc::new(NoopDatagramHandler));

        link_a.engine.notify(message(1), Duration::from_millis(100)).await.unwrap();

        assert_eq!(link_a.engine.transmit_queue.len(), 1);
        assert_eq!(link_b.engine.transmit_queue.len(), 0);
    }
}
