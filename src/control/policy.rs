//! Light-to-angle control policy.
//!
//! Maps the two LDR raw readings plus the runtime tuning onto a target servo
//! angle and a normalized intensity metric.  Pure and deterministic — no
//! clocks, no hardware, no globals — so the whole policy is testable on the
//! host.
//!
//! The left/right bias asymmetry (1.5 vs 0.5 by default) is inherited from
//! the shipped firmware.  It has no stated physical rationale and one board
//! revision omitted it entirely, so it is carried as tuning rather than as a
//! constant.

use serde::{Deserialize, Serialize};

use crate::config::SystemConfig;

/// Runtime-mutable control parameters.
///
/// This is the slice of device state the command dispatcher edits: presets
/// overwrite `min_angle`/`controlling_factor`, the bias and full-scale values
/// come from [`SystemConfig`] and stay fixed for the life of the process.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ShadeTuning {
    pub min_angle: f32,
    pub controlling_factor: f32,
    pub left_bias: f32,
    pub right_bias: f32,
    pub full_scale_raw: f32,
}

impl ShadeTuning {
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            min_angle: config.min_angle,
            controlling_factor: config.controlling_factor,
            left_bias: config.left_bias,
            right_bias: config.right_bias,
            full_scale_raw: config.full_scale_raw,
        }
    }
}

/// Whichever of the two LDRs reported the higher raw reading this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DominantSide {
    Left,
    Right,
}

impl DominantSide {
    /// Tag used in the intensity telemetry payload.
    pub fn label(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Result of one control-policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlOutput {
    /// Target servo angle, clamped to the mechanical range [0, 180].
    pub angle_degrees: f32,
    /// Dominant-side reading normalized to [0, 1].
    pub normalized_intensity: f32,
    pub dominant: DominantSide,
}

/// Compute the target shade angle from the two raw LDR readings.
///
/// - Dominant side: `Right` iff `right_raw > left_raw`.  Equal readings are
///   treated as left-dominant, matching the strict `>` comparison.
/// - The dominant raw value is clamped to full-scale and normalized to
///   [0, 1]; saturated sensors therefore read as 1.0.
/// - `angle = min_angle * bias + (180 - min_angle) * normalized * factor`,
///   clamped to [0, 180].
pub fn compute_angle(left_raw: u16, right_raw: u16, tuning: &ShadeTuning) -> ControlOutput {
    let dominant = if right_raw > left_raw {
        DominantSide::Right
    } else {
        DominantSide::Left
    };

    let (raw, bias) = match dominant {
        DominantSide::Right => (right_raw as f32, tuning.right_bias),
        DominantSide::Left => (left_raw as f32, tuning.left_bias),
    };

    let normalized = raw.clamp(0.0, tuning.full_scale_raw) / tuning.full_scale_raw;
    let angle = tuning.min_angle * bias
        + (180.0 - tuning.min_angle) * normalized * tuning.controlling_factor;

    ControlOutput {
        angle_degrees: angle.clamp(0.0, 180.0),
        normalized_intensity: normalized,
        dominant,
    }
}
