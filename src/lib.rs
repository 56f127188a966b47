//! A reliable message-transport engine for point-to-point serial links, as used between
//!  a tape-transport controller board, its sibling controller board, and a wired remote
//!  console.
//!
//! ## Design goals
//!
//! * The abstraction is sending / receiving *messages* (an opcode plus two opaque 32-bit
//!   parameters) rather than streams of bytes
//! * Two kinds of traffic share one link:
//!   * *datagrams* - fire-and-forget, no sequence number, no reply
//!   * *transactions* - request/reply pairs correlated by a one-byte sequence number,
//!     with the reply carried in a message+ack frame echoing that number
//! * Bounded memory: all message slots live in fixed-capacity pools created at engine
//!   initialization and recycled forever; pool exhaustion surfaces as a timeout to the
//!   caller instead of an allocation
//! * Latency-sensitive traffic (button and LED state, for instance) can be flagged
//!   priority and is then serviced ahead of bulk traffic (a full display-buffer push)
//!   already queued; within a class, FIFO order holds
//! * The line is unreliable-enough, not hostile: checksum mismatches and partial frames
//!   are counted and retried quietly by the reader, never surfaced to the application
//! * Delivery contract for transactions is at-most-once-with-failure: a request that
//!   never sees its ack fails after the caller's timeout, and nothing is retransmitted
//!
//! ## Roles
//!
//! Each link runs three independent loops sharing one [`engine::LinkEngine`]:
//! * the *writer* drains the transmit queue to the frame transport
//! * the *reader* pulls inbound frames into pool-backed slots, retrying transport-level
//!   errors with the same reserved slot
//! * the *worker* classifies inbound frames, drives the application handlers, auto-acks
//!   ack-required requests, and lands inbound acks in the transaction window
//!
//! A process runs one engine per link; engines share no state. The byte-level frame
//!  codec, the serial port bring-up, and the tape-transport business logic all live
//!  behind the [`frame_transport::FrameTransport`] and [`handler`] collaborator traits.
//!
//! ## Transaction window
//!
//! In-flight transactions occupy one row each of a fixed window of ack slots, indexed by
//!  `(sequence - 1) mod window_size`. An inbound ack must both hit a pending row and
//!  match its stored sequence number to land; anything else is logged, counted and
//!  dropped. Keeping the number of concurrently outstanding transactions within the
//!  window is the callers' contract - the window bounds correlation state, it does not
//!  queue excess requests.

pub mod ack_table;
pub mod config;
pub mod counters;
pub mod engine;
pub mod frame;
pub mod frame_queue;
pub mod frame_transport;
pub mod handler;
pub mod message;
pub mod pool;
pub mod sequence;
