use std::fmt::{Debug, Formatter};

/// One generic 32-bit parameter slot. The slot stores raw bits and offers integer, unsigned
///  and float views, so application code on both ends of a link can agree on the
///  interpretation per opcode without the engine knowing about it.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Param(u32);

impl Param {
    pub const ZERO: Param = Param(0);

    pub fn from_u32(value: u32) -> Self {
        Param(value)
    }

    pub fn from_i32(value: i32) -> Self {
        Param(value as u32)
    }

    pub fn from_f32(value: f32) -> Self {
        Param(value.to_bits())
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    pub fn as_i32(&self) -> i32 {
        self.0 as i32
    }

    pub fn as_f32(&self) -> f32 {
        f32::from_bits(self.0)
    }
}

impl Debug for Param {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// The application payload of a frame: an opcode plus two parameter slots. Opaque to the
///  engine - it is queued, transmitted and correlated without ever being interpreted.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Message {
    pub opcode: u16,
    pub param1: Param,
    pub param2: Param,
}

impl Message {
    pub const EMPTY: Message = Message {
        opcode: 0,
        param1: Param::ZERO,
        param2: Param::ZERO,
    };

    pub fn new(opcode: u16, param1: Param, param2: Param) -> Message {
        Message {
            opcode,
            param1,
            param2,
        }
    }
}
