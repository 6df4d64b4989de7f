//! Property and fuzz-style tests for robustness of the control policy and
//! command decoder.
//!
//! Runs on host (x86_64) only — proptest is not available for ESP32 targets.

#![cfg(not(target_os = "espidf"))]

use proptest::prelude::*;
use sunblind::app::commands::{Command, CommandKind};
use sunblind::control::{compute_angle, DominantSide, ShadeTuning};
use sunblind::schedule::OneShotSchedule;

fn arb_tuning() -> impl Strategy<Value = ShadeTuning> {
    (
        0.0f32..=180.0,  // min_angle
        0.0f32..=10.0,   // controlling_factor, well past the clamp threshold
        0.0f32..=4.0,    // left_bias
        0.0f32..=4.0,    // right_bias
    )
        .prop_map(|(min_angle, controlling_factor, left_bias, right_bias)| ShadeTuning {
            min_angle,
            controlling_factor,
            left_bias,
            right_bias,
            full_scale_raw: 1023.0,
        })
}

proptest! {
    /// The policy output must land in the servo's mechanical range for any
    /// sensor readings and any tuning within configured bounds.
    #[test]
    fn angle_always_within_servo_range(
        left in any::<u16>(),
        right in any::<u16>(),
        tuning in arb_tuning(),
    ) {
        let out = compute_angle(left, right, &tuning);
        prop_assert!((0.0..=180.0).contains(&out.angle_degrees),
            "angle {} out of range", out.angle_degrees);
        prop_assert!((0.0..=1.0).contains(&out.normalized_intensity));
    }

    /// Dominant-side selection: strictly brighter right wins, ties go left.
    #[test]
    fn dominant_side_matches_comparison(
        left in any::<u16>(),
        right in any::<u16>(),
        tuning in arb_tuning(),
    ) {
        let out = compute_angle(left, right, &tuning);
        if right > left {
            prop_assert_eq!(out.dominant, DominantSide::Right);
        } else {
            prop_assert_eq!(out.dominant, DominantSide::Left);
        }
    }

    /// Same inputs, same output — the policy holds no hidden state.
    #[test]
    fn policy_is_deterministic(
        left in any::<u16>(),
        right in any::<u16>(),
        tuning in arb_tuning(),
    ) {
        let a = compute_angle(left, right, &tuning);
        let b = compute_angle(left, right, &tuning);
        prop_assert_eq!(a, b);
    }

    /// The decoder never panics on arbitrary payload text, for any kind.
    #[test]
    fn command_parse_never_panics(payload in ".*") {
        for kind in [
            CommandKind::Buzzer,
            CommandKind::Schedule,
            CommandKind::MinAngle,
            CommandKind::ControlFactor,
            CommandKind::Preset,
        ] {
            let _ = Command::parse(kind, &payload);
        }
    }

    /// Numeric commands either yield the finite value they spell or an error;
    /// non-finite spellings never get through.
    #[test]
    fn parsed_floats_are_finite(payload in ".*") {
        if let Ok(Command::SetMinAngle(v)) = Command::parse(CommandKind::MinAngle, &payload) {
            prop_assert!(v.is_finite());
        }
        if let Ok(Command::SetControlFactor(v)) =
            Command::parse(CommandKind::ControlFactor, &payload)
        {
            prop_assert!(v.is_finite());
        }
    }

    /// A one-shot schedule fires exactly once over any non-decreasing
    /// sequence of clock reads.
    #[test]
    fn schedule_fires_at_most_once(
        trigger in 0u64..=u32::MAX as u64,
        steps in proptest::collection::vec(0u64..=1_000, 1..=50),
    ) {
        let mut schedule = OneShotSchedule::new();
        schedule.arm(trigger);

        let mut now = 0u64;
        let mut fires = 0u32;
        for step in steps {
            now += step;
            if schedule.check(now) {
                fires += 1;
            }
        }
        prop_assert!(fires <= 1);
        if fires == 1 {
            prop_assert!(!schedule.is_armed());
            prop_assert!(now >= trigger);
        }
    }
}
