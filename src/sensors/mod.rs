//! Sensor subsystem — individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns every sensor driver and produces a [`SensorSnapshot`] each
//! tick for the application service.

pub mod climate;
pub mod light;

use log::warn;

use crate::app::ports::SensorSnapshot;
use crate::error::SensorError;
use climate::{ClimateReading, ClimateSensor};
use light::LightSensorPair;

/// Aggregates all sensor drivers and produces a unified snapshot.
pub struct SensorHub {
    pub light: LightSensorPair,
    pub climate: ClimateSensor,
    /// Last good DHT22 reading, reused across its occasional bad frames.
    last_climate: Option<ClimateReading>,
}

impl SensorHub {
    /// Construct a new hub.  Pass in pre-built drivers (built in main where
    /// peripheral ownership is established).
    pub fn new(light: LightSensorPair, climate: ClimateSensor) -> Self {
        Self {
            light,
            climate,
            last_climate: None,
        }
    }

    /// Read every sensor and return a unified snapshot.
    ///
    /// The DHT22 drops a frame every so often; a failed climate read falls
    /// back to the previous good value so one flaky frame does not cost a
    /// control cycle.  With no previous value, or on an LDR failure, the
    /// error propagates and the caller skips this cycle's actuation.
    pub fn read_all(&mut self) -> Result<SensorSnapshot, SensorError> {
        let light = self.light.read()?;

        let climate = match self.climate.read() {
            Ok(reading) => {
                self.last_climate = Some(reading);
                reading
            }
            Err(e) => match self.last_climate {
                Some(previous) => {
                    warn!("climate read failed ({}), reusing previous value", e);
                    previous
                }
                None => return Err(e),
            },
        };

        Ok(SensorSnapshot {
            left_raw: light.left_raw,
            right_raw: light.right_raw,
            temperature_c: climate.temperature_c,
            humidity_pct: climate.humidity_pct,
        })
    }
}
