//! Pure payload decoders for the three status exchanges.
//!
//! Decoders never fail. The payload's first byte gates everything: `1`
//! means the device answered authoritatively; anything else (or a missing
//! byte) yields "no data for this exchange," not an error. Truncated
//! buffers decode to however many complete fields they contain.

/// Per-channel alarm word bit positions.
///
/// These are a hardware contract with the amplifier firmware. Never
/// renumber or reorder them.
pub mod alarm_bits {
    /// Output clip detected.
    pub const CLIP: u32 = 1 << 0;
    /// Thermal safe-operating-area violation.
    pub const THERMAL_SOA: u32 = 1 << 1;
    /// Over-temperature protection.
    pub const OVER_TEMP: u32 = 1 << 3;
    /// Rail-voltage fault.
    pub const RAIL_FAULT: u32 = 1 << 4;
    /// Auxiliary-current fault.
    pub const AUX_CURRENT: u32 = 1 << 5;
    /// Unclassified fault.
    pub const OTHER_FAULT: u32 = 1 << 6;
    /// Low-load protection.
    pub const LOW_LOAD: u32 = 1 << 7;

    /// Check if a specific alarm bit is set in a word.
    #[inline]
    pub fn has_bit(word: u32, bit: u32) -> bool {
        word & bit != 0
    }
}

/// Most per-channel alarm words any firmware revision reports.
const MAX_ALARM_WORDS: usize = 8;

/// Gain/mute records are four fields: two i16 gains, two mute bytes.
const GAIN_RECORD_SIZE: usize = 6;

/// Decoded power/operating state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PowerState {
    /// Device answered authoritatively.
    pub answered: bool,
    /// Operating (true) or standby (false); `None` for unknown raw codes.
    pub power: Option<bool>,
}

/// Decode a standby-read reply payload.
///
/// Byte 0 is the answer-ok flag, byte 1 the raw state code: `2` means
/// operating, `1` means standby. Any other code leaves the power field
/// unset.
pub fn decode_power_state(payload: &[u8]) -> PowerState {
    if payload.first() != Some(&1) {
        return PowerState::default();
    }

    PowerState {
        answered: true,
        power: match payload.get(1).copied() {
            Some(2) => Some(true),
            Some(1) => Some(false),
            _ => None,
        },
    }
}

/// One channel's slice of the gain/mute table.
///
/// Fields decode independently so a record truncated mid-way keeps the
/// fields it has.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChannelGain {
    /// Input gain in decibels.
    pub input_gain_db: Option<f32>,
    /// Output gain in decibels.
    pub output_gain_db: Option<f32>,
    /// Input stage muted.
    pub input_mute: Option<bool>,
    /// Output stage muted.
    pub output_mute: Option<bool>,
}

impl ChannelGain {
    /// Effective gain: output takes priority, input is the fallback.
    pub fn gain_db(&self) -> Option<f32> {
        self.output_gain_db.or(self.input_gain_db)
    }

    /// Effective mute: output takes priority, input is the fallback.
    pub fn mute(&self) -> Option<bool> {
        self.output_mute.or(self.input_mute)
    }
}

/// Decoded gain/mute table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GainMuteTable {
    /// Device answered authoritatively.
    pub answered: bool,
    /// Per-channel records, possibly fewer than the device declared.
    pub channels: Vec<ChannelGain>,
}

/// Decode a gain/mute table reply payload.
///
/// Byte 0 is the answer-ok flag, byte 1 the channel count the device
/// claims to report (capped at `max_channels`). Each record carries, in
/// order: input gain (i16 LE, hundredths of dB), output gain (same),
/// input mute (1 = muted), output mute. A buffer shorter than the declared
/// count implies is valid and yields fewer populated channels.
pub fn decode_gain_mute(payload: &[u8], max_channels: usize) -> GainMuteTable {
    if payload.first() != Some(&1) {
        return GainMuteTable::default();
    }

    let declared = payload.get(1).map(|&n| n as usize).unwrap_or(0);
    let count = declared.min(max_channels);
    let mut channels = Vec::with_capacity(count);

    for index in 0..count {
        let at = 2 + index * GAIN_RECORD_SIZE;

        let input_gain_db = read_i16_le(payload, at).map(centi_db);
        if input_gain_db.is_none() {
            break;
        }
        let output_gain_db = read_i16_le(payload, at + 2).map(centi_db);
        let input_mute = payload.get(at + 4).map(|&b| b == 1);
        let output_mute = payload.get(at + 5).map(|&b| b == 1);
        let complete = output_mute.is_some();

        channels.push(ChannelGain {
            input_gain_db,
            output_gain_db,
            input_mute,
            output_mute,
        });

        if !complete {
            break;
        }
    }

    GainMuteTable {
        answered: true,
        channels,
    }
}

/// Decoded alarm-bitfield report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlarmReport {
    /// Device answered authoritatively.
    pub answered: bool,
    /// Raw GPIO alarm byte, preserved undecoded.
    pub gpio: u8,
    /// Global alarm word.
    pub global: u32,
    /// Per-channel alarm words, truncated to the buffer and channel cap.
    pub channel_words: Vec<u32>,
    /// Global word nonzero or any per-channel word nonzero.
    pub fault: bool,
}

/// Decode an alarm-bitfield reply payload.
///
/// Layout: answer-ok flag, GPIO alarm byte, two reserved bytes, a u32 LE
/// global alarm word, then up to eight u32 LE per-channel words.
pub fn decode_alarms(payload: &[u8], max_channels: usize) -> AlarmReport {
    if payload.first() != Some(&1) {
        return AlarmReport::default();
    }

    let gpio = payload.get(1).copied().unwrap_or(0);
    let global = read_u32_le(payload, 4).unwrap_or(0);

    let cap = max_channels.min(MAX_ALARM_WORDS);
    let mut channel_words = Vec::with_capacity(cap);
    for index in 0..cap {
        match read_u32_le(payload, 8 + index * 4) {
            Some(word) => channel_words.push(word),
            None => break,
        }
    }

    let fault = global != 0 || channel_words.iter().any(|&w| w != 0);

    AlarmReport {
        answered: true,
        gpio,
        global,
        channel_words,
        fault,
    }
}

/// Named per-channel alarm flags derived from one alarm word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelAlarms {
    pub clip: bool,
    pub thermal_soa: bool,
    pub over_temp: bool,
    pub rail_fault: bool,
    pub aux_current: bool,
    pub other_fault: bool,
    pub low_load: bool,
}

impl ChannelAlarms {
    /// Derive the named flags from a raw per-channel alarm word.
    pub fn from_word(word: u32) -> Self {
        use alarm_bits::*;
        Self {
            clip: has_bit(word, CLIP),
            thermal_soa: has_bit(word, THERMAL_SOA),
            over_temp: has_bit(word, OVER_TEMP),
            rail_fault: has_bit(word, RAIL_FAULT),
            aux_current: has_bit(word, AUX_CURRENT),
            other_fault: has_bit(word, OTHER_FAULT),
            low_load: has_bit(word, LOW_LOAD),
        }
    }
}

fn centi_db(raw: i16) -> f32 {
    raw as f32 / 100.0
}

fn read_i16_le(buf: &[u8], at: usize) -> Option<i16> {
    Some(i16::from_le_bytes([*buf.get(at)?, *buf.get(at + 1)?]))
}

fn read_u32_le(buf: &[u8], at: usize) -> Option<u32> {
    Some(u32::from_le_bytes([
        *buf.get(at)?,
        *buf.get(at + 1)?,
        *buf.get(at + 2)?,
        *buf.get(at + 3)?,
    ]))
}
