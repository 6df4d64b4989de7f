//! DHT22 temperature/humidity sensor.
//!
//! Single-wire protocol bit-banged by `hw_init::dht22_read`.  The DHT22
//! refreshes internally every ~2 s and occasionally NAKs or corrupts a
//! frame; callers treat a failed read as transient.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the data GPIO via the hw_init bit-bang helper.
//! On host/test: reads from static atomics for injection, including a
//! failure flag so tests can exercise the fallback path.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
use crate::error::SensorError;

#[cfg(not(target_os = "espidf"))]
static SIM_TEMP_MILLI_C: AtomicI32 = AtomicI32::new(25_000);
#[cfg(not(target_os = "espidf"))]
static SIM_HUMIDITY_MILLI_PCT: AtomicU32 = AtomicU32::new(50_000);
#[cfg(not(target_os = "espidf"))]
static SIM_FAILING: AtomicBool = AtomicBool::new(false);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_climate(temperature_c: f32, humidity_pct: f32) {
    SIM_TEMP_MILLI_C.store((temperature_c * 1000.0) as i32, Ordering::Relaxed);
    SIM_HUMIDITY_MILLI_PCT.store((humidity_pct * 1000.0) as u32, Ordering::Relaxed);
}

/// Make every simulated read fail until cleared.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_climate_failing(failing: bool) {
    SIM_FAILING.store(failing, Ordering::Relaxed);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateReading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

pub struct ClimateSensor {
    _data_gpio: i32,
}

impl ClimateSensor {
    pub fn new(data_gpio: i32) -> Self {
        Self {
            _data_gpio: data_gpio,
        }
    }

    pub fn read(&self) -> Result<ClimateReading, SensorError> {
        let (temperature_c, humidity_pct) = self.read_raw()?;
        // DHT22 datasheet limits; anything outside is a corrupt frame the
        // checksum happened to miss.
        if !(-40.0..=80.0).contains(&temperature_c) || !(0.0..=100.0).contains(&humidity_pct) {
            return Err(SensorError::OutOfRange);
        }
        Ok(ClimateReading {
            temperature_c,
            humidity_pct,
        })
    }

    #[cfg(target_os = "espidf")]
    fn read_raw(&self) -> Result<(f32, f32), SensorError> {
        hw_init::dht22_read(self._data_gpio)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_raw(&self) -> Result<(f32, f32), SensorError> {
        if SIM_FAILING.load(Ordering::Relaxed) {
            return Err(SensorError::DhtNoResponse);
        }
        Ok((
            SIM_TEMP_MILLI_C.load(Ordering::Relaxed) as f32 / 1000.0,
            SIM_HUMIDITY_MILLI_PCT.load(Ordering::Relaxed) as f32 / 1000.0,
        ))
    }
}
