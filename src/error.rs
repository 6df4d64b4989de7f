//! Error types for the SunBlind firmware.
//!
//! One enum per fallible subsystem (sensing, command parsing,
//! communications), each `Copy` so errors pass around without allocation.
//! `anyhow` takes over at the `main()` boundary.

use core::fmt;

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// ADC read returned an error or timed out.
    AdcReadFailed,
    /// The DHT22 did not answer the start handshake.
    DhtNoResponse,
    /// The DHT22 frame failed its checksum.
    DhtChecksumMismatch,
    /// Reading is outside the physically plausible range.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::DhtNoResponse => write!(f, "DHT22 not responding"),
            Self::DhtChecksumMismatch => write!(f, "DHT22 checksum mismatch"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

// ---------------------------------------------------------------------------
// Command parse errors
// ---------------------------------------------------------------------------

/// A malformed payload on a recognised command topic.
///
/// Parse failures are recoverable: the offending field is left unchanged and
/// the error is logged.  The device never zeroes a tuning parameter because
/// a dashboard sent garbage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Payload was empty where a value was required.
    EmptyPayload,
    /// Payload did not parse as a decimal number.
    InvalidNumber,
    /// Payload did not parse as an epoch-seconds timestamp.
    InvalidEpoch,
    /// Preset code is not in the preset table.
    UnknownPreset,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "empty payload"),
            Self::InvalidNumber => write!(f, "invalid number"),
            Self::InvalidEpoch => write!(f, "invalid epoch timestamp"),
            Self::UnknownPreset => write!(f, "unknown preset code"),
        }
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    MqttConnectFailed,
    MqttPublishFailed,
    SntpNotSynced,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MqttConnectFailed => write!(f, "MQTT connect failed"),
            Self::MqttPublishFailed => write!(f, "MQTT publish failed"),
            Self::SntpNotSynced => write!(f, "SNTP time not synced"),
        }
    }
}

// ---------------------------------------------------------------------------
// std::error::Error impls (for anyhow interop at the top level)
// ---------------------------------------------------------------------------

impl std::error::Error for SensorError {}
impl std::error::Error for ParseError {}
impl std::error::Error for CommsError {}
