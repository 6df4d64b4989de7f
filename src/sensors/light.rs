//! Paired LDR light sensors (left / right window edge).
//!
//! Two photoresistor voltage dividers read via the ESP32 ADC.  The control
//! policy works on the 10-bit sensor-native scale (0–1023), so the 12-bit
//! ADC counts are shifted down before they leave this module.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads both ADC1 channels via the oneshot API (initialised by
//! hw_init).  On host/test: reads from static atomics for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
use crate::error::SensorError;

#[cfg(not(target_os = "espidf"))]
static SIM_LEFT_RAW: AtomicU16 = AtomicU16::new(512);
#[cfg(not(target_os = "espidf"))]
static SIM_RIGHT_RAW: AtomicU16 = AtomicU16::new(512);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_light_raw(left: u16, right: u16) {
    SIM_LEFT_RAW.store(left, Ordering::Relaxed);
    SIM_RIGHT_RAW.store(right, Ordering::Relaxed);
}

/// Raw readings from both LDRs, 10-bit sensor-native scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightReading {
    pub left_raw: u16,
    pub right_raw: u16,
}

pub struct LightSensorPair {
    _left_gpio: i32,
    _right_gpio: i32,
}

impl LightSensorPair {
    pub fn new(left_gpio: i32, right_gpio: i32) -> Self {
        Self {
            _left_gpio: left_gpio,
            _right_gpio: right_gpio,
        }
    }

    pub fn read(&self) -> Result<LightReading, SensorError> {
        let (left_raw, right_raw) = self.read_adc()?;
        Ok(LightReading {
            left_raw,
            right_raw,
        })
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> Result<(u16, u16), SensorError> {
        let left = hw_init::adc1_read(hw_init::ADC1_CH_LDR_LEFT)?;
        let right = hw_init::adc1_read(hw_init::ADC1_CH_LDR_RIGHT)?;
        // 12-bit counts down to the 10-bit scale the policy expects.
        Ok((left >> 2, right >> 2))
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> Result<(u16, u16), SensorError> {
        Ok((
            SIM_LEFT_RAW.load(Ordering::Relaxed),
            SIM_RIGHT_RAW.load(Ordering::Relaxed),
        ))
    }
}
