//! Adapters — the outer hexagon ring.
//!
//! Each adapter implements one or more domain port traits on top of a real
//! resource: peripherals, the MQTT broker, the SNTP clock, or the serial
//! log.

pub mod hardware;
pub mod log_sink;
pub mod mqtt;
pub mod time;
pub mod wifi;
