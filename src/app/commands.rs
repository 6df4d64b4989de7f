//! Inbound commands to the application service.
//!
//! The shipped firmware compared topic strings inside the MQTT callback and
//! mutated globals inline.  Here the `(topic, payload)` pair is decoded once
//! at the boundary into a [`Command`] value; the service dispatches on it
//! with an exhaustive match.  Decoding is the only place payload text is
//! interpreted, so a malformed payload can never half-apply.

use crate::config::TopicConfig;
use crate::error::ParseError;

/// Which command topic an inbound message arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Buzzer on/off.
    Buzzer,
    /// Schedule arm/disarm.
    Schedule,
    /// Set minimum shade angle.
    MinAngle,
    /// Set controlling factor.
    ControlFactor,
    /// Preset selection.
    Preset,
}

/// Map a topic name onto a command kind.
///
/// Unrecognised topics return `None` and are ignored by the caller — an
/// unknown topic is noise on a shared broker, not an error.
pub fn classify(topics: &TopicConfig, topic: &str) -> Option<CommandKind> {
    if topic == topics.cmd_buzzer {
        Some(CommandKind::Buzzer)
    } else if topic == topics.cmd_schedule {
        Some(CommandKind::Schedule)
    } else if topic == topics.cmd_min_angle {
        Some(CommandKind::MinAngle)
    } else if topic == topics.cmd_control_factor {
        Some(CommandKind::ControlFactor)
    } else if topic == topics.cmd_preset {
        Some(CommandKind::Preset)
    } else {
        None
    }
}

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Turn the buzzer on or off.
    SetBuzzer(bool),
    /// Arm the one-shot schedule for the given epoch second.
    ArmSchedule(u64),
    /// Disarm the schedule without firing.
    ClearSchedule,
    /// Set the minimum shade angle (degrees).
    SetMinAngle(f32),
    /// Set the controlling factor (unitless gain).
    SetControlFactor(f32),
    /// Select a preset by its single-letter code.
    SelectPreset(char),
}

impl Command {
    /// Decode a payload for the given command kind.
    ///
    /// Payload conventions follow the dashboard wire format:
    /// - buzzer: first byte `'1'` means on, anything else means off;
    /// - schedule: leading `'N'` disarms, otherwise decimal epoch seconds;
    /// - min-angle / control-factor: decimal float;
    /// - preset: first non-whitespace character.
    pub fn parse(kind: CommandKind, payload: &str) -> Result<Self, ParseError> {
        match kind {
            CommandKind::Buzzer => Ok(Self::SetBuzzer(payload.as_bytes().first() == Some(&b'1'))),

            CommandKind::Schedule => {
                let trimmed = payload.trim();
                if trimmed.starts_with('N') {
                    return Ok(Self::ClearSchedule);
                }
                trimmed
                    .parse::<u64>()
                    .map(Self::ArmSchedule)
                    .map_err(|_| ParseError::InvalidEpoch)
            }

            CommandKind::MinAngle => parse_f32(payload).map(Self::SetMinAngle),

            CommandKind::ControlFactor => parse_f32(payload).map(Self::SetControlFactor),

            CommandKind::Preset => payload
                .trim()
                .chars()
                .next()
                .map(Self::SelectPreset)
                .ok_or(ParseError::EmptyPayload),
        }
    }
}

/// Parse a finite decimal float.  NaN/inf spellings are rejected: a tuning
/// parameter must stay arithmetically usable.
fn parse_f32(payload: &str) -> Result<f32, ParseError> {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyPayload);
    }
    match trimmed.parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ParseError::InvalidNumber),
    }
}
