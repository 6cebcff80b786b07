//! Protocol module - wire format and frame codec.
//!
//! This module implements the binary frame layer of the amplifier's UDP
//! feedback channel:
//! - Fixed wire constants and the CRC-16 checksum
//! - Frame encoding ([`build_frame`]) and parsing ([`Frame::decode`])

mod frame;
mod wire_format;

pub use frame::{build_frame, Frame};
pub use wire_format::{
    checksum, commands, CRC_INIT, CRC_POLY, END_BYTE, HEADER_SIZE, MAX_DATAGRAM_SIZE,
    MIN_FRAME_SIZE, START_BYTE, TRAILER_SIZE,
};
