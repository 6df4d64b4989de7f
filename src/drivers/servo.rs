//! Shade servo driver (SG90-class positional servo).
//!
//! Standard RC servo timing: a 50 Hz frame with a 600–2400 µs pulse mapping
//! linearly onto 0–180°.  Driven via LEDC channel 0.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes real LEDC duty counts via hw_init helpers.
//! On host/test: tracks the commanded angle in-memory only.

use crate::drivers::hw_init;
use crate::pins;

/// Full PWM frame length at 50 Hz, in microseconds.
const FRAME_US: u32 = 1_000_000 / pins::SERVO_PWM_FREQ_HZ;

/// Map an angle in [0, 180] onto the servo pulse width in microseconds.
pub fn angle_to_pulse_us(degrees: f32) -> u32 {
    let degrees = degrees.clamp(0.0, 180.0);
    let span = (pins::SERVO_MAX_PULSE_US - pins::SERVO_MIN_PULSE_US) as f32;
    pins::SERVO_MIN_PULSE_US + (degrees / 180.0 * span) as u32
}

/// Map a pulse width onto a 14-bit LEDC duty count.
fn pulse_to_duty(pulse_us: u32) -> u32 {
    let max_duty = (1u32 << pins::SERVO_PWM_RESOLUTION_BITS) - 1;
    ((pulse_us as u64 * max_duty as u64) / FRAME_US as u64) as u32
}

pub struct ServoDriver {
    current_angle: f32,
}

impl ServoDriver {
    pub fn new() -> Self {
        Self { current_angle: 0.0 }
    }

    /// Position the servo.  Out-of-range requests are clamped, not rejected;
    /// the policy already clamps and the mechanics do the rest.
    pub fn set_angle(&mut self, degrees: f32) {
        let degrees = degrees.clamp(0.0, 180.0);
        let duty = pulse_to_duty(angle_to_pulse_us(degrees));
        hw_init::ledc_set(hw_init::LEDC_CH_SERVO, duty);
        self.current_angle = degrees;
    }

    /// Stop driving the servo (duty 0 releases the horn on most SG90s).
    pub fn idle(&mut self) {
        hw_init::ledc_set(hw_init::LEDC_CH_SERVO, 0);
    }

    pub fn current_angle(&self) -> f32 {
        self.current_angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_endpoints_match_servo_datasheet() {
        assert_eq!(angle_to_pulse_us(0.0), 600);
        assert_eq!(angle_to_pulse_us(180.0), 2_400);
        assert_eq!(angle_to_pulse_us(90.0), 1_500);
    }

    #[test]
    fn out_of_range_angles_clamp() {
        assert_eq!(angle_to_pulse_us(-10.0), 600);
        assert_eq!(angle_to_pulse_us(270.0), 2_400);
    }

    #[test]
    fn duty_fits_resolution() {
        let max_duty = (1u32 << pins::SERVO_PWM_RESOLUTION_BITS) - 1;
        for angle in [0.0, 45.0, 90.0, 135.0, 180.0] {
            let duty = pulse_to_duty(angle_to_pulse_us(angle));
            assert!(duty < max_duty);
        }
        // 2400 µs in a 20 ms frame is 12% duty — sanity-check the scale.
        let duty_180 = pulse_to_duty(angle_to_pulse_us(180.0));
        assert!((duty_180 as f32 / max_duty as f32 - 0.12).abs() < 0.01);
    }

    #[test]
    fn driver_tracks_commanded_angle() {
        let mut servo = ServoDriver::new();
        servo.set_angle(102.97);
        assert!((servo.current_angle() - 102.97).abs() < 1e-3);
        servo.set_angle(200.0);
        assert_eq!(servo.current_angle(), 180.0);
    }
}
