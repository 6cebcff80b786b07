//! # netamp
//!
//! Async UDP status client for a networked power-amplifier device family.
//!
//! The amplifiers expose a secondary feedback channel: a custom binary
//! protocol over UDP that reports power state, per-channel gain/mute, and
//! alarm bitfields without going through the slower HTTP API. This crate
//! implements that channel end to end and exposes one high-level operation,
//! [`read_status`], to the host integration layer.
//!
//! ## Architecture
//!
//! - **Frame codec** ([`protocol`]): fixed binary frame layout with a
//!   CRC-16 checksum and an inverted-command integrity trailer
//! - **Transport** ([`transport`]): single-shot exchanges over ephemeral
//!   UDP sockets, correlated by a per-request cookie, bounded by a deadline
//! - **Decoders & aggregation** ([`status`]): pure payload decoders and the
//!   partial-success snapshot merge
//!
//! ## Example
//!
//! ```no_run
//! use netamp::{read_status, DeviceConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = DeviceConfig {
//!         channels: 4,
//!         ..DeviceConfig::new("192.168.10.41")
//!     };
//!
//!     let status = read_status(&config).await;
//!     println!("power: {:?}, fault: {:?}", status.power, status.fault);
//!     for (i, channel) in status.channels.iter().enumerate() {
//!         println!("ch{}: gain {:?} dB, mute {:?}", i, channel.gain_db, channel.mute);
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod protocol;
pub mod status;
pub mod transport;

pub use config::DeviceConfig;
pub use error::{NetampError, Result};
pub use status::{read_status, ChannelStatus, DeviceStatus};
