//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and both actuator drivers, exposing them through
//! [`SensorPort`] and [`ActuatorPort`].  This is the only module in the
//! system that touches actual hardware.  On non-espidf targets, the
//! underlying drivers use cfg-gated simulation stubs.

use crate::app::ports::{ActuatorPort, SensorPort, SensorSnapshot};
use crate::drivers::buzzer::BuzzerDriver;
use crate::drivers::servo::ServoDriver;
use crate::error::SensorError;
use crate::sensors::SensorHub;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    sensor_hub: SensorHub,
    servo: ServoDriver,
    buzzer: BuzzerDriver,
}

impl HardwareAdapter {
    pub fn new(sensor_hub: SensorHub, servo: ServoDriver, buzzer: BuzzerDriver) -> Self {
        Self {
            sensor_hub,
            servo,
            buzzer,
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_all(&mut self) -> Result<SensorSnapshot, SensorError> {
        self.sensor_hub.read_all()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn set_shade_angle(&mut self, degrees: f32) {
        self.servo.set_angle(degrees);
    }

    fn set_buzzer(&mut self, on: bool) {
        self.buzzer.set(on);
    }

    fn is_buzzer_on(&self) -> bool {
        self.buzzer.is_on()
    }

    fn all_off(&mut self) {
        self.servo.idle();
        self.buzzer.set(false);
    }
}
