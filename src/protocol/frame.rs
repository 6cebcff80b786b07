//! Frame struct with typed accessors, encoder, and parser.
//!
//! [`build_frame`] lays out a complete request; [`Frame::decode`] parses a
//! received datagram back into header fields and payload. The parser checks
//! structure only (length, start marker, declared payload bounds); checksum
//! and end-marker verification is left to the transport, which acts on the
//! inverted-command correlation instead.
//!
//! # Example
//!
//! ```
//! use netamp::protocol::{build_frame, commands, Frame};
//!
//! let bytes = build_frame(commands::READ_ALARMS, 0x1234, 5000, &[], false);
//! let frame = Frame::decode(&bytes).unwrap();
//!
//! assert_eq!(frame.command, commands::READ_ALARMS);
//! assert_eq!(frame.cookie, 0x1234);
//! assert_eq!(frame.reply_port, 5000);
//! assert!(frame.payload.is_empty());
//! ```

use bytes::Bytes;

use super::wire_format::{checksum, END_BYTE, HEADER_SIZE, MIN_FRAME_SIZE, START_BYTE, TRAILER_SIZE};
use crate::error::{NetampError, Result};

/// A decoded protocol frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Command byte as present on the wire. Replies carry the request's
    /// command bitwise-inverted; see [`Frame::request_command`].
    pub command: u8,
    /// Correlation cookie echoed by the device.
    pub cookie: u16,
    /// Declared reply port (0 = "use your default").
    pub reply_port: u16,
    /// Payload bytes (zero-copy slice of the received datagram).
    pub payload: Bytes,
    /// Checksum field as transmitted. Not verified by the parser.
    pub checksum: u16,
    /// Trailer byte: bitwise inverse of this frame's command byte.
    pub command_check: u8,
    /// End marker byte as transmitted. Not verified by the parser.
    pub end_byte: u8,
}

impl Frame {
    /// Parse a complete frame from a received datagram.
    ///
    /// # Errors
    ///
    /// Returns [`NetampError::MalformedFrame`] when the buffer is shorter
    /// than the minimum frame size, the start marker does not match, or the
    /// declared payload length extends past the buffer end.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < MIN_FRAME_SIZE {
            return Err(NetampError::MalformedFrame("frame shorter than minimum"));
        }
        if buf[0] != START_BYTE {
            return Err(NetampError::MalformedFrame("bad start marker"));
        }

        let command = buf[1];
        let cookie = u16::from_le_bytes([buf[2], buf[3]]);
        let payload_len = u16::from_le_bytes([buf[4], buf[5]]) as usize;
        let reply_port = u16::from_le_bytes([buf[6], buf[7]]);

        let payload_end = HEADER_SIZE + payload_len;
        if payload_end + TRAILER_SIZE > buf.len() {
            return Err(NetampError::MalformedFrame("declared payload exceeds buffer"));
        }

        Ok(Self {
            command,
            cookie,
            reply_port,
            payload: Bytes::copy_from_slice(&buf[HEADER_SIZE..payload_end]),
            checksum: u16::from_le_bytes([buf[payload_end], buf[payload_end + 1]]),
            command_check: buf[payload_end + 2],
            end_byte: buf[payload_end + 3],
        })
    }

    /// The command byte with the reply inversion undone.
    ///
    /// Devices answer with the request command bitwise-inverted in the
    /// header; this recovers the original request command for comparison.
    #[inline]
    pub fn request_command(&self) -> u8 {
        !self.command
    }

    /// Get a reference to the payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Get the payload length.
    #[inline]
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the trailer byte is consistent with the header command.
    #[inline]
    pub fn command_check_ok(&self) -> bool {
        self.command_check == !self.command
    }
}

/// Build a complete request frame as a single byte vector.
///
/// Lays out start marker, command, cookie, payload length, reply port, the
/// payload verbatim, the checksum, the inverted command byte, and the end
/// marker. With `zero_checksum` set, the checksum field is written as zero
/// irrespective of the computed value, as required by the standby-read
/// command, whose firmware rejects non-zero checksums on that exchange.
///
/// Always succeeds for payloads within the 16-bit length range.
pub fn build_frame(
    command: u8,
    cookie: u16,
    reply_port: u16,
    payload: &[u8],
    zero_checksum: bool,
) -> Vec<u8> {
    debug_assert!(payload.len() <= u16::MAX as usize);

    let mut buf = Vec::with_capacity(MIN_FRAME_SIZE + payload.len());
    buf.push(START_BYTE);
    buf.push(command);
    buf.extend_from_slice(&cookie.to_le_bytes());
    buf.extend_from_slice(&(payload.len() as u16).to_le_bytes());
    buf.extend_from_slice(&reply_port.to_le_bytes());
    buf.extend_from_slice(payload);

    let crc = if zero_checksum { 0 } else { checksum(&buf) };
    buf.extend_from_slice(&crc.to_le_bytes());
    buf.push(!command);
    buf.push(END_BYTE);
    buf
}
