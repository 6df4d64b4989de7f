//! One-shot buzzer schedule.
//!
//! The dashboard arms a single future trigger time (epoch seconds, already
//! offset to local time by the clock adapter).  When the current time reaches
//! the trigger the schedule fires exactly once and disarms itself; it stays
//! disarmed until a new arm command re-creates it.
//!
//! The comparison is `>=`, not `==`: the polling loop runs at ~1 Hz and an
//! exact-second match can be skipped when a cycle overruns.

use log::info;

/// One-shot future trigger.
///
/// The trigger time is only meaningful while armed, which the `Option`
/// encodes directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OneShotSchedule {
    armed: Option<u64>,
}

impl OneShotSchedule {
    pub fn new() -> Self {
        Self { armed: None }
    }

    /// Arm the schedule for `trigger_epoch_secs`.  Re-arming replaces any
    /// previously armed trigger.
    pub fn arm(&mut self, trigger_epoch_secs: u64) {
        self.armed = Some(trigger_epoch_secs);
        info!("schedule: armed for epoch {}", trigger_epoch_secs);
    }

    /// Disarm without firing.
    pub fn clear(&mut self) {
        if self.armed.take().is_some() {
            info!("schedule: cleared");
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Trigger time while armed.
    pub fn trigger_epoch(&self) -> Option<u64> {
        self.armed
    }

    /// Check the schedule against the current time.
    ///
    /// Returns `true` exactly once per armed trigger: when `now` has reached
    /// the trigger time, the schedule disarms itself and reports the fire.
    /// Disarmed schedules are a no-op.
    pub fn check(&mut self, now_epoch_secs: u64) -> bool {
        match self.armed {
            Some(trigger) if now_epoch_secs >= trigger => {
                self.armed = None;
                info!(
                    "schedule: fired (trigger={}, now={})",
                    trigger, now_epoch_secs
                );
                true
            }
            _ => false,
        }
    }
}
