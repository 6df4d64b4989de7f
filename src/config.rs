//! System configuration parameters
//!
//! All tunable parameters for the SunBlind controller.  The source firmware
//! iterations hard-coded pin numbers, topic strings and preset tables and
//! diverged between copies; everything variant-specific lives here instead.
//! Configuration is rebuilt from defaults on every boot — the device has no
//! persistent settings store.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Shade control defaults ---
    /// Minimum shade angle in degrees (lower bound of the servo sweep).
    pub min_angle: f32,
    /// Gain applied to normalized light intensity when computing the angle.
    pub controlling_factor: f32,
    /// Bias multiplier applied to `min_angle` when the left LDR dominates.
    pub left_bias: f32,
    /// Bias multiplier applied to `min_angle` when the right LDR dominates.
    pub right_bias: f32,
    /// Sensor full-scale raw value (10-bit LDR frontend).
    pub full_scale_raw: f32,
    /// Minimum left/right raw difference before the servo is repositioned.
    pub actuation_deadband_raw: f32,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
    /// Telemetry report interval (seconds)
    pub telemetry_interval_secs: u32,

    // --- Clock ---
    /// Offset added to NTP epoch time for local schedules (seconds).
    pub time_offset_secs: i32,

    // --- Messaging ---
    /// MQTT broker hostname.
    pub broker_host: String,
    /// MQTT broker port.
    pub broker_port: u16,
    /// MQTT client identifier.
    pub client_id: String,
    /// Topic names (inbound command + outbound telemetry).
    pub topics: TopicConfig,

    // --- WiFi ---
    pub wifi_ssid: String,
    pub wifi_password: String,

    // --- Presets ---
    pub presets: PresetTable,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Shade control
            min_angle: 30.0,
            controlling_factor: 0.75,
            left_bias: 1.5,
            right_bias: 0.5,
            full_scale_raw: 1023.0,
            actuation_deadband_raw: 30.0,

            // Timing
            control_loop_interval_ms: 1000, // 1 Hz
            telemetry_interval_secs: 5,

            // Clock (UTC+5:30)
            time_offset_secs: 19_800,

            // Messaging
            broker_host: "test.mosquitto.org".into(),
            broker_port: 1883,
            client_id: "SUNBLIND-55200255".into(),
            topics: TopicConfig::default(),

            // WiFi (provisioned at build/deploy time)
            wifi_ssid: String::new(),
            wifi_password: String::new(),

            presets: PresetTable::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Topics
// ---------------------------------------------------------------------------

/// MQTT topic names.
///
/// The source iterations renamed these inconsistently between copies, so they
/// are configuration rather than constants.  Defaults match the last board
/// revision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicConfig {
    /// Inbound: buzzer on/off (`'1'` = on).
    pub cmd_buzzer: String,
    /// Inbound: schedule arm (epoch seconds) or disarm (`'N'`).
    pub cmd_schedule: String,
    /// Inbound: set minimum shade angle (f32).
    pub cmd_min_angle: String,
    /// Inbound: set controlling factor (f32).
    pub cmd_control_factor: String,
    /// Inbound: preset selection (single-letter code).
    pub cmd_preset: String,
    /// Outbound: temperature in °C.
    pub pub_temperature: String,
    /// Outbound: light-intensity JSON report tagged with the dominant side.
    pub pub_intensity: String,
    /// Outbound: servo angle applied this cycle.
    pub pub_servo_angle: String,
    /// Outbound: echo of the effective minimum angle.
    pub pub_angle_echo: String,
    /// Outbound: echo of the effective controlling factor.
    pub pub_factor_echo: String,
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            cmd_buzzer: "MQTT-ON-OFF".into(),
            cmd_schedule: "MQTT-SCH-ON".into(),
            cmd_min_angle: "MQTT-MIN-ANG".into(),
            cmd_control_factor: "MQTT-CTRL-FAC".into(),
            cmd_preset: "MQTT-DROP-DOWN".into(),
            pub_temperature: "MQTT-TEMP".into(),
            pub_intensity: "MQTT-LDR".into(),
            pub_servo_angle: "MQTT-SERVO-ANG".into(),
            pub_angle_echo: "MQTT-SET-ANG".into(),
            pub_factor_echo: "MQTT-SET-FAC".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

/// Payload byte on the preset topic that selects "custom" mode — re-applies
/// the last explicitly set (min-angle, controlling-factor) pair.
pub const CUSTOM_PRESET_CODE: char = 'X';

/// A named (min-angle, controlling-factor) bundle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Single-letter selection code.
    pub code: char,
    pub min_angle: f32,
    pub controlling_factor: f32,
}

/// Selectable preset table.  Injected into the dispatcher rather than being
/// hard-coded in the command handling branches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetTable {
    entries: Vec<Preset>,
}

impl PresetTable {
    pub fn new(entries: Vec<Preset>) -> Self {
        Self { entries }
    }

    /// Look up a preset by its selection code (case-insensitive).
    pub fn lookup(&self, code: char) -> Option<Preset> {
        let code = code.to_ascii_uppercase();
        self.entries.iter().copied().find(|p| p.code == code)
    }

    pub fn entries(&self) -> &[Preset] {
        &self.entries
    }
}

impl Default for PresetTable {
    fn default() -> Self {
        Self {
            entries: vec![
                Preset { code: 'D', min_angle: 30.0, controlling_factor: 0.75 },
                Preset { code: 'A', min_angle: 30.0, controlling_factor: 0.5 },
                Preset { code: 'B', min_angle: 45.0, controlling_factor: 0.3 },
                Preset { code: 'C', min_angle: 60.0, controlling_factor: 0.8 },
            ],
        }
    }
}
