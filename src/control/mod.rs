//! Shade control — pure sensor-to-angle policy.

pub mod policy;

pub use policy::{compute_angle, ControlOutput, DominantSide, ShadeTuning};
