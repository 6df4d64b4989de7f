//! Port traits — the hexagonal boundary between domain logic and the outside
//! world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, event sinks, the clock) implement
//! these traits.  The [`AppService`](super::service::AppService) consumes
//! them via generics, so the domain core never touches hardware directly.

use crate::error::SensorError;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// One cycle's worth of raw sensor data.  Produced each tick, not retained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSnapshot {
    /// Left LDR raw reading (sensor-native scale, nominally 0–1023).
    pub left_raw: u16,
    /// Right LDR raw reading.
    pub right_raw: u16,
    /// DHT22 temperature in °C.
    pub temperature_c: f32,
    /// DHT22 relative humidity in %.
    pub humidity_pct: f32,
}

/// Read-side port: the domain calls this to obtain sensor data.
pub trait SensorPort {
    /// Read every sensor and return a unified snapshot.
    ///
    /// A failed read is a transient fault: the caller skips this cycle's
    /// actuation and keeps the previous angle rather than crashing the loop.
    fn read_all(&mut self) -> Result<SensorSnapshot, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
pub trait ActuatorPort {
    /// Position the shade servo (degrees, 0–180; out-of-range input is
    /// clamped by the driver).
    fn set_shade_angle(&mut self, degrees: f32);

    /// Start or stop the buzzer tone.
    fn set_buzzer(&mut self, on: bool);

    /// Query whether the buzzer is currently sounding.
    fn is_buzzer_on(&self) -> bool;

    /// Kill all actuators (servo idle, buzzer off) — safe shutdown.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, MQTT
/// publish, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Time port (driven adapter: wall clock → domain)
// ───────────────────────────────────────────────────────────────

/// Wall-clock access for the schedule monitor.
///
/// Returns local epoch seconds (NTP time plus the configured offset), or
/// `None` while the clock has not yet synced.  The schedule monitor treats
/// `None` as "not yet" rather than an error.
pub trait TimePort {
    fn now_epoch_secs(&self) -> Option<u64>;
}
