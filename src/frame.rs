use crate::sequence::SeqNum;
use bitflags::bitflags;

bitflags! {
    /// Per-frame flag bits. The on-wire bit positions are the frame codec's concern; these
    ///  values only need to be stable within a running engine.
    #[derive(Copy, Clone, Eq, PartialEq, Debug)]
    pub struct FrameFlags: u8 {
        /// no reply expected, no sequence number assigned
        const DATAGRAM     = 0b0000_0001;
        /// the receiver must answer with a message+ack frame echoing `sequence`
        const ACK_REQUIRED = 0b0000_0010;
        /// serviced ahead of normal-class frames already queued
        const PRIORITY     = 0b0000_0100;
    }
}

/// The two frame classes on the wire: a plain message, or a message doubling as the
///  acknowledgment of an earlier ack-required frame.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum FrameKind {
    MessageOnly,
    MessageAck,
}

/// Frame control block: everything the engine needs to route a frame, kept separate from
///  the opaque [`Message`](crate::message::Message) payload.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct FrameControl {
    pub kind: FrameKind,
    pub flags: FrameFlags,
    pub sequence: SeqNum,
    /// echo of the original request's sequence number; meaningful on `MessageAck` frames only
    pub acknak: SeqNum,
}

impl FrameControl {
    pub fn datagram(priority: bool) -> FrameControl {
        let mut flags = FrameFlags::DATAGRAM;
        if priority {
            flags |= FrameFlags::PRIORITY;
        }
        FrameControl {
            kind: FrameKind::MessageOnly,
            flags,
            sequence: SeqNum::UNASSIGNED,
            acknak: SeqNum::UNASSIGNED,
        }
    }

    pub fn request(sequence: SeqNum) -> FrameControl {
        FrameControl {
            kind: FrameKind::MessageOnly,
            flags: FrameFlags::ACK_REQUIRED,
            sequence,
            acknak: SeqNum::UNASSIGNED,
        }
    }

    pub fn reply(acknak: SeqNum) -> FrameControl {
        FrameControl {
            kind: FrameKind::MessageAck,
            flags: FrameFlags::empty(),
            sequence: SeqNum::UNASSIGNED,
            acknak,
        }
    }

    pub fn is_priority(&self) -> bool {
        self.flags.contains(FrameFlags::PRIORITY)
    }
}
