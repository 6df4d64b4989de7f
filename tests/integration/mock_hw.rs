//! Mock adapters for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real GPIO/PWM registers, and provides a
//! settable clock and sensor snapshot.

use std::cell::Cell;

use sunblind::app::events::AppEvent;
use sunblind::app::ports::{ActuatorPort, EventSink, SensorPort, SensorSnapshot, TimePort};
use sunblind::error::SensorError;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    SetShadeAngle(f32),
    SetBuzzer(bool),
    AllOff,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
    /// Snapshot returned by the next `read_all`.
    pub snapshot: SensorSnapshot,
    /// When set, `read_all` fails with this error.
    pub sensor_fault: Option<SensorError>,
    buzzer_on: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            snapshot: SensorSnapshot {
                left_raw: 512,
                right_raw: 512,
                temperature_c: 25.0,
                humidity_pct: 50.0,
            },
            sensor_fault: None,
            buzzer_on: false,
        }
    }

    pub fn set_light(&mut self, left_raw: u16, right_raw: u16) {
        self.snapshot.left_raw = left_raw;
        self.snapshot.right_raw = right_raw;
    }

    pub fn last_call(&self) -> Option<&ActuatorCall> {
        self.calls.last()
    }

    /// Most recent servo angle commanded, if any.
    pub fn last_angle(&self) -> Option<f32> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::SetShadeAngle(a) => Some(*a),
            _ => None,
        })
    }

    pub fn servo_call_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, ActuatorCall::SetShadeAngle(_)))
            .count()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_all(&mut self) -> Result<SensorSnapshot, SensorError> {
        match self.sensor_fault {
            Some(e) => Err(e),
            None => Ok(self.snapshot),
        }
    }
}

impl ActuatorPort for MockHardware {
    fn set_shade_angle(&mut self, degrees: f32) {
        self.calls.push(ActuatorCall::SetShadeAngle(degrees));
    }

    fn set_buzzer(&mut self, on: bool) {
        self.buzzer_on = on;
        self.calls.push(ActuatorCall::SetBuzzer(on));
    }

    fn is_buzzer_on(&self) -> bool {
        self.buzzer_on
    }

    fn all_off(&mut self) {
        self.buzzer_on = false;
        self.calls.push(ActuatorCall::AllOff);
    }
}

// ── MockClock ─────────────────────────────────────────────────

/// Settable wall clock; `None` models an unsynced SNTP state.
pub struct MockClock {
    now: Cell<Option<u64>>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn unsynced() -> Self {
        Self { now: Cell::new(None) }
    }

    pub fn at(epoch: u64) -> Self {
        Self {
            now: Cell::new(Some(epoch)),
        }
    }

    pub fn set(&self, epoch: u64) {
        self.now.set(Some(epoch));
    }
}

impl TimePort for MockClock {
    fn now_epoch_secs(&self) -> Option<u64> {
        self.now.get()
    }
}

// ── RecordingSink ─────────────────────────────────────────────

/// Collects every emitted event for later assertions.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count_of(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}
