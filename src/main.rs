//! SunBlind Firmware — Main Entry Point
//!
//! Hexagonal architecture with event-driven execution.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                  │
//! │                                                          │
//! │  HardwareAdapter    LogEventSink    SntpTimeAdapter      │
//! │  (Sensor+Actuator)  (EventSink)     (TimePort)           │
//! │  WifiAdapter        MqttAdapter                          │
//! │  (Connectivity)     (EventSink + inbound commands)       │
//! │                                                          │
//! │  ─────────────── Port Trait Boundary ─────────────────   │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │             AppService (pure logic)                │  │
//! │  │  shade policy · command dispatch · schedule        │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use sunblind::adapters::hardware::HardwareAdapter;
use sunblind::adapters::log_sink::LogEventSink;
use sunblind::adapters::mqtt::MqttAdapter;
use sunblind::adapters::time::SntpTimeAdapter;
use sunblind::adapters::wifi::WifiAdapter;
use sunblind::app::commands::{classify, Command};
use sunblind::app::events::AppEvent;
use sunblind::app::ports::EventSink;
use sunblind::app::service::AppService;
use sunblind::config::{SystemConfig, TopicConfig};
use sunblind::drivers::buzzer::BuzzerDriver;
use sunblind::drivers::servo::ServoDriver;
use sunblind::events::{self, push_event, Event};
use sunblind::sensors::climate::ClimateSensor;
use sunblind::sensors::light::LightSensorPair;
use sunblind::sensors::SensorHub;
use sunblind::{drivers, pins};

// ── Broadcast sink ────────────────────────────────────────────
//
// Every application event goes to the serial log and, when the broker is
// up, to MQTT.  Built fresh at each call site from short-lived borrows.

struct Broadcast<'a>(&'a mut LogEventSink, &'a mut MqttAdapter);

impl EventSink for Broadcast<'_> {
    fn emit(&mut self, event: &AppEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}

// ── Inbound command drain ─────────────────────────────────────

/// Decode and dispatch every queued broker message.  Runs on the
/// `CommandReceived` event and once per cycle regardless, so commands are
/// never stranded behind a dropped wakeup.
fn drain_commands(
    app: &mut AppService,
    hw: &mut HardwareAdapter,
    log_sink: &mut LogEventSink,
    mqtt: &mut MqttAdapter,
    topics: &TopicConfig,
) {
    while let Some(msg) = mqtt.poll_inbound() {
        let Some(kind) = classify(topics, &msg.topic) else {
            warn!("unrecognised topic '{}'", msg.topic);
            continue;
        };
        match Command::parse(kind, &msg.payload) {
            Ok(cmd) => {
                app.handle_command(cmd, hw, &mut Broadcast(log_sink, mqtt));
            }
            Err(e) => {
                // Malformed payloads leave the running configuration
                // untouched.
                warn!("bad payload on '{}': {}", msg.topic, e);
            }
        }
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }

    info!("SunBlind v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt; the watchdog
        // resets the board after timeout.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 3. Configuration ──────────────────────────────────────
    // Rebuilt from defaults every boot; there is no persistent store.
    let config = SystemConfig::default();

    // ── 4. Construct adapters ─────────────────────────────────
    let sensor_hub = SensorHub::new(
        LightSensorPair::new(pins::LDR_LEFT_ADC_GPIO, pins::LDR_RIGHT_ADC_GPIO),
        ClimateSensor::new(pins::DHT_DATA_GPIO),
    );
    let mut hw = HardwareAdapter::new(sensor_hub, ServoDriver::new(), BuzzerDriver::new());

    let mut log_sink = LogEventSink::new();

    let mut wifi = WifiAdapter::new();
    if config.wifi_ssid.is_empty() {
        warn!("WiFi: no credentials configured, running offline");
    } else {
        if let Err(e) = wifi.set_credentials(&config.wifi_ssid, &config.wifi_password) {
            warn!("WiFi: invalid credentials — {}", e);
        }
        if let Err(e) = wifi.connect() {
            warn!("WiFi: initial connect failed ({}), retrying in background", e);
        }
    }

    let mut mqtt = MqttAdapter::new(
        config.topics.clone(),
        &config.broker_host,
        config.broker_port,
        &config.client_id,
    );
    if wifi.is_connected() {
        if let Err(e) = mqtt.connect() {
            warn!("MQTT: initial connect failed ({}), retrying in background", e);
        }
    }

    let clock = SntpTimeAdapter::new(config.time_offset_secs)?;

    // ── 5. Construct app service ──────────────────────────────
    let mut app = AppService::new(&config);
    app.start(&mut Broadcast(&mut log_sink, &mut mqtt));

    info!("System ready. Entering event loop.");

    // ── 6. Event loop ─────────────────────────────────────────
    let mut telemetry_counter: u64 = 0;

    loop {
        // Pace the loop at the control interval.  On ESP-IDF this lands in
        // vTaskDelay, yielding to the MQTT and WiFi tasks.
        std::thread::sleep(std::time::Duration::from_millis(
            config.control_loop_interval_ms as u64,
        ));
        push_event(Event::ControlTick);

        telemetry_counter += 1;
        if telemetry_counter >= config.telemetry_interval_secs as u64 {
            push_event(Event::TelemetryTick);
            telemetry_counter = 0;
        }

        // Process all pending events.
        events::drain_events(|event| match event {
            Event::ControlTick => {
                app.tick(&mut hw, &clock, &mut Broadcast(&mut log_sink, &mut mqtt));
            }

            Event::TelemetryTick => {
                if let Some(t) = app.build_telemetry() {
                    let mut sink = Broadcast(&mut log_sink, &mut mqtt);
                    sink.emit(&AppEvent::Telemetry(t));
                }
            }

            Event::CommandReceived => {
                drain_commands(&mut app, &mut hw, &mut log_sink, &mut mqtt, &config.topics);
            }
        });

        // Catch anything the broker queued since the last wakeup, dropped
        // wakeup or not.
        drain_commands(&mut app, &mut hw, &mut log_sink, &mut mqtt, &config.topics);

        // Connection upkeep (bounded exponential backoff inside).
        wifi.poll();
        if wifi.is_connected() {
            mqtt.poll();
        }
    }
}
