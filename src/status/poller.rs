//! Status polling aggregator.
//!
//! Orchestrates the three status exchanges into one snapshot. Exchanges are
//! independent: a timeout or transport failure on one is logged and skipped,
//! never aborting the others, so the poll always yields a snapshot with
//! whatever subset of fields the device answered this cycle.

use crate::config::DeviceConfig;
use crate::error::NetampError;
use crate::protocol::commands;
use crate::status::decode::{
    decode_alarms, decode_gain_mute, decode_power_state, ChannelAlarms,
};
use crate::status::DeviceStatus;
use crate::transport::exchange;

/// Standby-read requests carry a fixed 4-byte placeholder payload.
const STANDBY_PLACEHOLDER: [u8; 4] = [0, 0, 0, 0];

/// Read the device's current status.
///
/// Performs the standby-read, gain/mute, and alarm exchanges sequentially
/// against the configured device and merges whatever succeeded into a fresh
/// [`DeviceStatus`]. Never fails: fields whose exchange missed stay `None`.
///
/// # Example
///
/// ```no_run
/// use netamp::{read_status, DeviceConfig};
///
/// # async fn poll() {
/// let config = DeviceConfig::new("192.168.10.41");
/// let status = read_status(&config).await;
/// if let Some(power) = status.power {
///     println!("amplifier is {}", if power { "on" } else { "in standby" });
/// }
/// # }
/// ```
pub async fn read_status(config: &DeviceConfig) -> DeviceStatus {
    let channel_count = config.channel_count();
    let mut status = DeviceStatus::with_channels(channel_count);

    match poll(config, commands::READ_STANDBY, &STANDBY_PLACEHOLDER).await {
        Ok(payload) => {
            let state = decode_power_state(&payload);
            if state.answered {
                status.power = state.power;
            }
        }
        Err(e) => tracing::debug!("Standby read skipped for {}: {}", config.host, e),
    }

    match poll(config, commands::READ_GAIN_MUTE, &[]).await {
        Ok(payload) => {
            let table = decode_gain_mute(&payload, channel_count);
            for (slot, gain) in status.channels.iter_mut().zip(&table.channels) {
                slot.gain_db = gain.gain_db();
                slot.mute = gain.mute();
            }
        }
        Err(e) => tracing::debug!("Gain/mute read skipped for {}: {}", config.host, e),
    }

    match poll(config, commands::READ_ALARMS, &[]).await {
        Ok(payload) => {
            let report = decode_alarms(&payload, channel_count);
            if report.answered {
                status.fault = Some(report.fault);
                for (slot, &word) in status.channels.iter_mut().zip(&report.channel_words) {
                    let alarms = ChannelAlarms::from_word(word);
                    slot.clip = Some(alarms.clip);
                    slot.thermal_soa = Some(alarms.thermal_soa);
                    slot.over_temp = Some(alarms.over_temp);
                    slot.rail_fault = Some(alarms.rail_fault);
                    slot.aux_current = Some(alarms.aux_current);
                    slot.other_fault = Some(alarms.other_fault);
                    slot.low_load = Some(alarms.low_load);
                }
            }
        }
        Err(e) => tracing::debug!("Alarm read skipped for {}: {}", config.host, e),
    }

    status
}

async fn poll(
    config: &DeviceConfig,
    command: u8,
    payload: &[u8],
) -> Result<bytes::Bytes, NetampError> {
    exchange(
        &config.host,
        config.port,
        command,
        payload,
        config.timeout(),
        config.zero_reply_port,
    )
    .await
}
