//! Piezo buzzer driver.
//!
//! A passive piezo on LEDC channel 1: a tone is a square wave at
//! [`pins::BUZZER_TONE_HZ`] with 50% duty; silence is duty 0.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the LEDC channel via hw_init helpers.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::pins;

/// 50% of the 8-bit buzzer duty range.
const TONE_DUTY: u32 = 128;

pub struct BuzzerDriver {
    sounding: bool,
}

impl BuzzerDriver {
    pub fn new() -> Self {
        Self { sounding: false }
    }

    pub fn set(&mut self, on: bool) {
        if on {
            hw_init::ledc_set_tone(pins::BUZZER_TONE_HZ);
            hw_init::ledc_set(hw_init::LEDC_CH_BUZZER, TONE_DUTY);
        } else {
            hw_init::ledc_set(hw_init::LEDC_CH_BUZZER, 0);
        }
        self.sounding = on;
    }

    pub fn is_on(&self) -> bool {
        self.sounding
    }
}
