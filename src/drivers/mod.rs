//! Hardware drivers — servo, buzzer, and one-shot peripheral init.
//!
//! Every driver follows the dual-target pattern: real register access on
//! ESP-IDF, in-memory state tracking on the host.

pub mod buzzer;
pub mod hw_init;
pub mod servo;
