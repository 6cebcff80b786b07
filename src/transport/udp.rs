//! Single-shot UDP request/reply exchange.
//!
//! Each exchange owns a fresh ephemeral socket for its entire lifetime:
//! bind, send one request frame, wait for the first correlation-matching
//! reply, release. The device answers to the port named in the request's
//! reply-port field, not necessarily the packet's source port, so the bound
//! local port is threaded into the frame (unless the config asks for 0).
//!
//! Retries are the polling cycle's responsibility; this layer resolves
//! exactly once per call, with [`NetampError::Timeout`] when no matching
//! reply arrives before the deadline.

use std::time::Duration;

use bytes::Bytes;
use tokio::net::UdpSocket;
use tokio::time::{timeout_at, Instant};

use crate::error::{NetampError, Result};
use crate::protocol::{build_frame, commands, Frame, MAX_DATAGRAM_SIZE};

/// Perform one request/reply exchange against a device.
///
/// Encodes a frame for `command` with a fresh cookie, sends it to
/// `host:port`, and waits for the first structurally valid reply whose
/// inverted command and cookie both match. Non-matching datagrams are
/// skipped and the wait continues until `deadline` elapses.
///
/// The standby-read command is framed with a forced-zero checksum; the
/// firmware rejects that exchange otherwise.
///
/// # Errors
///
/// - [`NetampError::Transport`] on bind/send/recv failure
/// - [`NetampError::Timeout`] when no matching reply arrives in time
pub async fn exchange(
    host: &str,
    port: u16,
    command: u8,
    payload: &[u8],
    timeout: Duration,
    zero_reply_port: bool,
) -> Result<Bytes> {
    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    let local_port = socket.local_addr()?.port();

    let cookie = fresh_cookie();
    let reply_port = if zero_reply_port { 0 } else { local_port };
    let zero_checksum = command == commands::READ_STANDBY;
    let request = build_frame(command, cookie, reply_port, payload, zero_checksum);

    socket.send_to(&request, (host, port)).await?;

    let deadline = Instant::now() + timeout;
    let mut buf = [0u8; MAX_DATAGRAM_SIZE];

    loop {
        let (len, peer) = match timeout_at(deadline, socket.recv_from(&mut buf)).await {
            Ok(Ok(received)) => received,
            Ok(Err(e)) => return Err(NetampError::Transport(e)),
            Err(_) => return Err(NetampError::Timeout),
        };

        let frame = match Frame::decode(&buf[..len]) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::debug!("Discarding malformed datagram from {}: {}", peer, e);
                continue;
            }
        };

        if frame.request_command() != command {
            tracing::debug!(
                "Discarding reply for command 0x{:02X} while waiting on 0x{:02X}",
                frame.request_command(),
                command
            );
            continue;
        }
        if frame.cookie != cookie {
            tracing::debug!(
                "Discarding stale reply, cookie 0x{:04X} != 0x{:04X}",
                frame.cookie,
                cookie
            );
            continue;
        }

        return Ok(frame.payload);
    }
    // Socket is dropped on every exit path, including cancellation.
}

/// Fresh 16-bit correlation cookie using system time and process ID.
///
/// Not a security token, just a per-exchange disambiguator for stale or
/// cross-talk replies on an unreliable transport.
fn fresh_cookie() -> u16 {
    use std::time::{SystemTime, UNIX_EPOCH};

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);

    let pid = std::process::id() as u64;
    let mixed = nanos.wrapping_mul(0x517cc1b727220a95) ^ pid;
    (mixed ^ (mixed >> 16) ^ (mixed >> 32) ^ (mixed >> 48)) as u16
}
