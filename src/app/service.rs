//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the runtime device state (shade tuning, buzzer flag,
//! one-shot schedule, custom preset pair) and exposes a clean,
//! hardware-agnostic API.  All I/O flows through port traits injected at
//! call sites, making the entire service testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!   TimePort  ──▶ │       AppService        │
//! ActuatorPort ◀──│ policy · dispatch · sched│
//!                 └────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::{SystemConfig, PresetTable, CUSTOM_PRESET_CODE};
use crate::control::{compute_angle, ControlOutput, ShadeTuning};
use crate::error::ParseError;
use crate::schedule::OneShotSchedule;

use super::commands::Command;
use super::events::{AppEvent, TelemetryData};
use super::ports::{ActuatorPort, EventSink, SensorPort, SensorSnapshot, TimePort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    tuning: ShadeTuning,
    presets: PresetTable,
    schedule: OneShotSchedule,
    buzzer_on: bool,
    /// Last explicitly set pair, re-applied by the custom preset.
    custom_min_angle: f32,
    custom_controlling_factor: f32,
    /// Minimum left/right raw difference before the servo is repositioned.
    deadband_raw: f32,
    /// Angle currently held by the servo.
    applied_angle: f32,
    last_output: Option<ControlOutput>,
    last_snapshot: Option<SensorSnapshot>,
    tick_count: u64,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// State starts from defaults on every boot — there is deliberately no
    /// persisted device state to restore.
    pub fn new(config: &SystemConfig) -> Self {
        let tuning = ShadeTuning::from_config(config);
        Self {
            tuning,
            presets: config.presets.clone(),
            schedule: OneShotSchedule::new(),
            buzzer_on: false,
            custom_min_angle: tuning.min_angle,
            custom_controlling_factor: tuning.controlling_factor,
            deadband_raw: config.actuation_deadband_raw,
            applied_angle: tuning.min_angle,
            last_output: None,
            last_snapshot: None,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Announce startup and echo the initial tuning to the dashboard.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started);
        sink.emit(&AppEvent::ConfigEchoed {
            min_angle: self.tuning.min_angle,
            controlling_factor: self.tuning.controlling_factor,
        });
        info!(
            "AppService started (min_angle={:.1}, factor={:.2})",
            self.tuning.min_angle, self.tuning.controlling_factor
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle: read sensors → policy → servo → schedule.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`] — this avoids a double mutable borrow while keeping
    /// the port boundary explicit.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        clock: &impl TimePort,
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;

        // 1. Read sensors via SensorPort.  A transient failure skips this
        //    cycle's actuation; the servo holds its previous angle.
        match hw.read_all() {
            Ok(snapshot) => {
                self.last_snapshot = Some(snapshot);

                // 2. Pure policy evaluation.
                let output = compute_angle(snapshot.left_raw, snapshot.right_raw, &self.tuning);
                self.last_output = Some(output);

                // 3. Reposition the servo only outside the deadband — a few
                //    counts of left/right noise must not make it chatter.
                let diff = (snapshot.left_raw as f32 - snapshot.right_raw as f32).abs();
                if diff > self.deadband_raw {
                    hw.set_shade_angle(output.angle_degrees);
                    self.applied_angle = output.angle_degrees;
                }
            }
            Err(e) => {
                warn!("sensor read failed ({}), holding previous angle", e);
            }
        }

        // 4. Schedule check runs even on a failed sensor read — the buzzer
        //    must still fire on time.
        self.check_schedule(hw, clock, sink);
    }

    /// Compare the armed schedule against the wall clock and fire once due.
    fn check_schedule(
        &mut self,
        hw: &mut impl ActuatorPort,
        clock: &impl TimePort,
        sink: &mut impl EventSink,
    ) {
        let Some(now) = clock.now_epoch_secs() else {
            // Clock not synced yet; the trigger stays armed.
            return;
        };
        let Some(trigger) = self.schedule.trigger_epoch() else {
            return;
        };
        if self.schedule.check(now) {
            self.buzzer_on = true;
            hw.set_buzzer(true);
            sink.emit(&AppEvent::ScheduleFired {
                trigger_epoch: trigger,
            });
            sink.emit(&AppEvent::BuzzerChanged { on: true });
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process a decoded external command.
    ///
    /// Parsing already happened at the boundary, so every variant here is
    /// well-formed; the only remaining soft failure is an unknown preset
    /// code, which is logged and ignored.
    pub fn handle_command(
        &mut self,
        cmd: Command,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            Command::SetBuzzer(on) => {
                self.buzzer_on = on;
                hw.set_buzzer(on);
                sink.emit(&AppEvent::BuzzerChanged { on });
            }

            Command::ArmSchedule(trigger) => {
                self.schedule.arm(trigger);
            }

            Command::ClearSchedule => {
                self.schedule.clear();
            }

            Command::SetMinAngle(v) => {
                self.tuning.min_angle = v;
                self.custom_min_angle = v;
                info!("min angle set to {:.1}", v);
            }

            Command::SetControlFactor(v) => {
                self.tuning.controlling_factor = v;
                self.custom_controlling_factor = v;
                info!("controlling factor set to {:.2}", v);
            }

            Command::SelectPreset(code) => self.select_preset(code, sink),
        }
    }

    fn select_preset(&mut self, code: char, sink: &mut impl EventSink) {
        let code = code.to_ascii_uppercase();

        if code == CUSTOM_PRESET_CODE {
            // Custom mode re-applies the last explicitly set pair.
            self.tuning.min_angle = self.custom_min_angle;
            self.tuning.controlling_factor = self.custom_controlling_factor;
        } else if let Some(preset) = self.presets.lookup(code) {
            self.tuning.min_angle = preset.min_angle;
            self.tuning.controlling_factor = preset.controlling_factor;
        } else {
            warn!("preset '{}' ignored: {}", code, ParseError::UnknownPreset);
            return;
        }

        info!(
            "preset '{}': min_angle={:.1}, factor={:.2}",
            code, self.tuning.min_angle, self.tuning.controlling_factor
        );
        sink.emit(&AppEvent::ConfigEchoed {
            min_angle: self.tuning.min_angle,
            controlling_factor: self.tuning.controlling_factor,
        });
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot from the most recent cycle, or `None`
    /// before the first successful sensor read.
    pub fn build_telemetry(&self) -> Option<TelemetryData> {
        let snapshot = self.last_snapshot?;
        let output = self.last_output?;
        Some(TelemetryData {
            temperature_c: snapshot.temperature_c,
            humidity_pct: snapshot.humidity_pct,
            intensity: output.normalized_intensity,
            dominant: output.dominant,
            angle_degrees: self.applied_angle,
            buzzer_on: self.buzzer_on,
            schedule_armed: self.schedule.is_armed(),
        })
    }

    /// Current control tuning (for tests and read-back).
    pub fn tuning(&self) -> &ShadeTuning {
        &self.tuning
    }

    pub fn buzzer_on(&self) -> bool {
        self.buzzer_on
    }

    pub fn schedule_armed(&self) -> bool {
        self.schedule.is_armed()
    }

    pub fn schedule_trigger(&self) -> Option<u64> {
        self.schedule.trigger_epoch()
    }

    /// Angle currently held by the servo.
    pub fn applied_angle(&self) -> f32 {
        self.applied_angle
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
