//! GPIO / peripheral pin assignments for the SunBlind main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  The board iterations renumbered pins between
//! revisions; keeping them in one module is what lets a single firmware
//! cover all of them.

// ---------------------------------------------------------------------------
// Shade servo (SG90-class, LEDC PWM)
// ---------------------------------------------------------------------------

/// LEDC PWM output for the shading servo.
pub const SERVO_PWM_GPIO: i32 = 18;
/// Servo pulse width at 0° (microseconds).
pub const SERVO_MIN_PULSE_US: u32 = 600;
/// Servo pulse width at 180° (microseconds).
pub const SERVO_MAX_PULSE_US: u32 = 2_400;

// ---------------------------------------------------------------------------
// Buzzer (passive piezo, LEDC tone)
// ---------------------------------------------------------------------------

/// LEDC PWM output for the piezo buzzer.
pub const BUZZER_GPIO: i32 = 4;
/// Tone frequency used for alarm beeps.
pub const BUZZER_TONE_HZ: u32 = 256;

// ---------------------------------------------------------------------------
// Sensors — Analog (ADC1)
// ---------------------------------------------------------------------------

/// Left LDR voltage divider.  ADC1 channel 4 (GPIO 5).
pub const LDR_LEFT_ADC_GPIO: i32 = 5;
/// Right LDR voltage divider.  ADC1 channel 8 (GPIO 25).
pub const LDR_RIGHT_ADC_GPIO: i32 = 25;

// ---------------------------------------------------------------------------
// Sensors — Digital
// ---------------------------------------------------------------------------

/// DHT22 temperature/humidity sensor — single-wire data line.
pub const DHT_DATA_GPIO: i32 = 14;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution for the servo channel (bits).  14-bit at 50 Hz
/// gives ~1.2 µs pulse granularity.
pub const SERVO_PWM_RESOLUTION_BITS: u32 = 14;
/// Servo PWM frame rate (standard RC servo timing).
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
/// LEDC timer resolution for the buzzer channel (bits).
pub const BUZZER_PWM_RESOLUTION_BITS: u32 = 8;
