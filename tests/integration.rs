//! Integration tests for netamp.
//!
//! Each test stands up a simulated amplifier on a loopback UDP socket and
//! drives the real client stack against it.

use std::time::{Duration, Instant};

use tokio::net::UdpSocket;

use netamp::protocol::{build_frame, checksum, commands, Frame, MAX_DATAGRAM_SIZE};
use netamp::transport::exchange;
use netamp::{read_status, DeviceConfig, NetampError};

/// A simulated amplifier that serves `cycles` request/reply rounds.
///
/// Commands without an entry in `behavior` are ignored (the client must
/// time out on them). Replies go to the reply port declared in the request
/// frame, echoing the cookie and the inverted command.
async fn spawn_amp(behavior: fn(u8) -> Option<Vec<u8>>, cycles: usize) -> u16 {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = socket.local_addr().unwrap().port();

    tokio::spawn(async move {
        let mut buf = [0u8; MAX_DATAGRAM_SIZE];
        for _ in 0..cycles {
            let Ok((len, _)) = socket.recv_from(&mut buf).await else {
                return;
            };
            let Ok(request) = Frame::decode(&buf[..len]) else {
                continue;
            };
            if let Some(payload) = behavior(request.command) {
                let reply = build_frame(!request.command, request.cookie, 0, &payload, false);
                let _ = socket
                    .send_to(&reply, ("127.0.0.1", request.reply_port))
                    .await;
            }
        }
    });

    port
}

fn config_for(port: u16, channels: usize) -> DeviceConfig {
    DeviceConfig {
        port,
        timeout_ms: 200,
        channels,
        ..DeviceConfig::new("127.0.0.1")
    }
}

fn alarm_payload(global: u32, words: &[u32]) -> Vec<u8> {
    let mut payload = vec![1, 0, 0, 0];
    payload.extend(global.to_le_bytes());
    for word in words {
        payload.extend(word.to_le_bytes());
    }
    payload
}

fn gain_payload(records: &[(i16, i16, u8, u8)]) -> Vec<u8> {
    let mut payload = vec![1, records.len() as u8];
    for &(input, output, imute, omute) in records {
        payload.extend(input.to_le_bytes());
        payload.extend(output.to_le_bytes());
        payload.push(imute);
        payload.push(omute);
    }
    payload
}

/// Full poll: all three exchanges answered.
#[tokio::test]
async fn test_full_status_snapshot() {
    let port = spawn_amp(
        |command| match command {
            commands::READ_STANDBY => Some(vec![1, 2]),
            commands::READ_GAIN_MUTE => Some(gain_payload(&[(-600, -300, 0, 0), (0, 0, 0, 1)])),
            commands::READ_ALARMS => Some(alarm_payload(0, &[0b1000_0011, 0])),
            _ => None,
        },
        3,
    )
    .await;

    let status = read_status(&config_for(port, 2)).await;

    assert_eq!(status.power, Some(true));
    assert_eq!(status.fault, Some(true));
    assert_eq!(status.channels.len(), 2);

    let ch0 = &status.channels[0];
    assert_eq!(ch0.gain_db, Some(-3.0));
    assert_eq!(ch0.mute, Some(false));
    assert_eq!(ch0.clip, Some(true));
    assert_eq!(ch0.thermal_soa, Some(true));
    assert_eq!(ch0.low_load, Some(true));
    assert_eq!(ch0.over_temp, Some(false));

    let ch1 = &status.channels[1];
    assert_eq!(ch1.mute, Some(true));
    assert_eq!(ch1.clip, Some(false));
}

/// The device answers only the alarm exchange; power and gain fields must
/// stay unknown while alarm data is populated.
#[tokio::test]
async fn test_partial_snapshot_alarms_only() {
    let port = spawn_amp(
        |command| match command {
            commands::READ_ALARMS => Some(alarm_payload(1, &[0])),
            _ => None,
        },
        3,
    )
    .await;

    let status = read_status(&config_for(port, 1)).await;

    assert_eq!(status.power, None);
    assert_eq!(status.fault, Some(true));
    assert_eq!(status.channels[0].gain_db, None);
    assert_eq!(status.channels[0].mute, None);
    assert_eq!(status.channels[0].clip, Some(false));
}

/// A dead device yields an all-unknown snapshot, never an error.
#[tokio::test]
async fn test_silent_device_all_unknown() {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = socket.local_addr().unwrap().port();

    let status = read_status(&config_for(port, 2)).await;

    assert_eq!(status.power, None);
    assert_eq!(status.fault, None);
    assert!(status
        .channels
        .iter()
        .all(|c| c.gain_db.is_none() && c.mute.is_none() && c.clip.is_none()));
}

/// Standby raw code 1 maps to power off.
#[tokio::test]
async fn test_standby_maps_to_power_off() {
    let port = spawn_amp(
        |command| (command == commands::READ_STANDBY).then(|| vec![1, 1]),
        3,
    )
    .await;

    let status = read_status(&config_for(port, 1)).await;
    assert_eq!(status.power, Some(false));
}

/// A not-ok answer flag means "no data," not a false reading.
#[tokio::test]
async fn test_not_ok_answer_leaves_fields_unset() {
    let port = spawn_amp(
        |command| match command {
            commands::READ_STANDBY => Some(vec![0, 2]),
            commands::READ_ALARMS => Some(vec![0]),
            _ => None,
        },
        3,
    )
    .await;

    let status = read_status(&config_for(port, 1)).await;
    assert_eq!(status.power, None);
    assert_eq!(status.fault, None);
}

/// A single exchange against a silent endpoint resolves with `Timeout`
/// close to the configured deadline.
#[tokio::test]
async fn test_exchange_timeout_duration() {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = socket.local_addr().unwrap().port();

    let started = Instant::now();
    let result = exchange(
        "127.0.0.1",
        port,
        commands::READ_ALARMS,
        &[],
        Duration::from_millis(200),
        false,
    )
    .await;
    let elapsed = started.elapsed();

    assert!(matches!(result, Err(NetampError::Timeout)));
    assert!(elapsed >= Duration::from_millis(200));
    assert!(elapsed < Duration::from_millis(700), "took {:?}", elapsed);
}

/// Repeated polling must not leak sockets: every exchange binds and
/// releases its own endpoint, so a burst of polls keeps working.
#[tokio::test]
async fn test_repeated_polls_release_endpoints() {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = socket.local_addr().unwrap().port();

    let config = DeviceConfig {
        timeout_ms: 10,
        ..config_for(port, 1)
    };

    for _ in 0..50 {
        let status = read_status(&config).await;
        assert_eq!(status.power, None);
    }
}

/// The standby-read request goes out with a zero checksum field; the other
/// commands carry the computed CRC.
#[tokio::test]
async fn test_request_checksums_on_the_wire() {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = socket.local_addr().unwrap().port();

    let observer = tokio::spawn(async move {
        let mut buf = [0u8; MAX_DATAGRAM_SIZE];
        let mut seen = Vec::new();
        for _ in 0..3 {
            let (len, _) = socket.recv_from(&mut buf).await.unwrap();
            let frame = Frame::decode(&buf[..len]).unwrap();
            let covered = len - 4; // start marker through last payload byte
            seen.push((frame.command, frame.checksum, checksum(&buf[..covered])));
        }
        seen
    });

    let _ = read_status(&config_for(port, 1)).await;
    let seen = observer.await.unwrap();

    assert_eq!(seen.len(), 3);
    for (command, sent, computed) in seen {
        if command == commands::READ_STANDBY {
            assert_eq!(sent, 0);
        } else {
            assert_eq!(sent, computed);
        }
    }
}
