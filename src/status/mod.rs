//! Device status snapshot types and the polling aggregator.
//!
//! A snapshot is a plain owned value built fresh on every poll. Every field
//! is optional: `None` means the exchange that populates it did not succeed
//! this cycle, which is distinct from a reported `false`.

mod decode;
mod poller;

pub use decode::{
    alarm_bits, decode_alarms, decode_gain_mute, decode_power_state, AlarmReport, ChannelAlarms,
    ChannelGain, GainMuteTable, PowerState,
};
pub use poller::read_status;

use serde::Serialize;

/// Per-channel slice of a status snapshot.
///
/// Populated incrementally: gain/mute from one exchange, alarm flags from
/// another. A channel may be partially populated if one exchange failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChannelStatus {
    /// Channel muted.
    pub mute: Option<bool>,
    /// Channel gain in decibels.
    pub gain_db: Option<f32>,
    /// Clip detected.
    pub clip: Option<bool>,
    /// Thermal safe-operating-area violation.
    pub thermal_soa: Option<bool>,
    /// Over-temperature protection active.
    pub over_temp: Option<bool>,
    /// Rail-voltage fault.
    pub rail_fault: Option<bool>,
    /// Auxiliary-current fault.
    pub aux_current: Option<bool>,
    /// Unclassified fault.
    pub other_fault: Option<bool>,
    /// Low-load protection active.
    pub low_load: Option<bool>,
}

/// Aggregate device status from one poll cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceStatus {
    /// Device operating (true) or in standby (false).
    pub power: Option<bool>,
    /// Any global or per-channel alarm word nonzero.
    pub fault: Option<bool>,
    /// Per-channel status, sized to the configured channel count.
    pub channels: Vec<ChannelStatus>,
}

impl DeviceStatus {
    /// Create an all-unknown snapshot for `channels` channels.
    pub fn with_channels(channels: usize) -> Self {
        Self {
            power: None,
            fault: None,
            channels: vec![ChannelStatus::default(); channels],
        }
    }
}
