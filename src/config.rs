//! Device connection parameters.
//!
//! Provided by the host integration's config layer. Carries everything the
//! status poller needs for one device: destination, per-exchange deadline,
//! the reply-port-zero override, and the channel count.
//!
//! # Example
//!
//! ```
//! use netamp::DeviceConfig;
//!
//! let config = DeviceConfig::new("192.168.10.41");
//! assert_eq!(config.port, 1234);
//! assert_eq!(config.timeout().as_millis(), 800);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default device UDP port.
pub const DEFAULT_PORT: u16 = 1234;

/// Default per-exchange timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 800;

/// Maximum channels any device in the family exposes.
pub const MAX_CHANNELS: usize = 8;

/// Connection parameters for one amplifier device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Destination host name or IP address.
    pub host: String,
    /// Device UDP port.
    pub port: u16,
    /// Per-exchange timeout in milliseconds.
    pub timeout_ms: u64,
    /// Send 0 as the reply-port field ("use your default") instead of the
    /// bound ephemeral port. Needed by some firmware revisions behind NAT.
    pub zero_reply_port: bool,
    /// Number of physical amplifier channels (clamped to [`MAX_CHANNELS`]).
    pub channels: usize,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            zero_reply_port: false,
            channels: 2,
        }
    }
}

impl DeviceConfig {
    /// Create a config for the given host with default parameters.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Per-exchange timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Channel count clamped to the device family maximum.
    pub fn channel_count(&self) -> usize {
        self.channels.min(MAX_CHANNELS)
    }
}
