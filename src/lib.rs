//! SunBlind firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod events;
pub mod schedule;

pub mod pins;

// ESP-IDF-facing modules; platform implementations are guarded by cfg
// attributes inside, simulation stubs compile everywhere.
pub mod adapters;
pub mod drivers;
pub mod sensors;
