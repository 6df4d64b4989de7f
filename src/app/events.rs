//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them — log to serial, publish over MQTT, etc.

use crate::control::DominantSide;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),

    /// The effective (min-angle, controlling-factor) pair changed or was
    /// re-announced; sinks echo it back to the dashboard config topics.
    ConfigEchoed {
        min_angle: f32,
        controlling_factor: f32,
    },

    /// The one-shot schedule fired and disarmed itself.
    ScheduleFired { trigger_epoch: u64 },

    /// The buzzer was switched by a command or schedule fire.
    BuzzerChanged { on: bool },

    /// The application service has started.
    Started,
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryData {
    pub temperature_c: f32,
    pub humidity_pct: f32,
    /// Dominant-side light intensity, normalized to [0, 1].
    pub intensity: f32,
    pub dominant: DominantSide,
    /// Angle most recently applied to the servo, degrees.
    pub angle_degrees: f32,
    pub buzzer_on: bool,
    pub schedule_armed: bool,
}
