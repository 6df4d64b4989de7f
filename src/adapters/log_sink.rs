//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to the
//! logger (UART / USB-CDC in production).  The MQTT adapter implements the
//! same trait for the broker-facing copy of each event.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | T={:.1}\u{00b0}C RH={:.0}% | light={:.2} ({}) | \
                     angle={:.1}\u{00b0} | buzzer={} | schedule={}",
                    t.temperature_c,
                    t.humidity_pct,
                    t.intensity,
                    t.dominant.label(),
                    t.angle_degrees,
                    if t.buzzer_on { "ON" } else { "off" },
                    if t.schedule_armed { "armed" } else { "idle" },
                );
            }
            AppEvent::ConfigEchoed {
                min_angle,
                controlling_factor,
            } => {
                info!(
                    "CONF  | min_angle={:.1} factor={:.2}",
                    min_angle, controlling_factor
                );
            }
            AppEvent::ScheduleFired { trigger_epoch } => {
                info!("SCHED | fired (trigger={})", trigger_epoch);
            }
            AppEvent::BuzzerChanged { on } => {
                info!("BUZZ  | {}", if *on { "on" } else { "off" });
            }
            AppEvent::Started => {
                info!("START | service up");
            }
        }
    }
}
