//! AppService integration tests: control cycles, schedule firing and
//! actuation gating against mock adapters.

use sunblind::app::events::AppEvent;
use sunblind::app::service::AppService;
use sunblind::config::SystemConfig;

use crate::mock_hw::{ActuatorCall, MockClock, MockHardware, RecordingSink};

fn service() -> AppService {
    AppService::new(&SystemConfig::default())
}

// ── Control cycle ─────────────────────────────────────────────

#[test]
fn tick_positions_servo_from_light_imbalance() {
    let mut app = service();
    let mut hw = MockHardware::new();
    let clock = MockClock::unsynced();
    let mut sink = RecordingSink::new();

    // Right dominates by well over the deadband.
    hw.set_light(300, 800);
    app.tick(&mut hw, &clock, &mut sink);

    // angle = 30*0.5 + 150*(800/1023)*0.75 ≈ 102.98
    let angle = hw.last_angle().expect("servo should have been positioned");
    assert!((angle - 102.977).abs() < 0.01, "got {angle}");
    assert!((app.applied_angle() - angle).abs() < f32::EPSILON);
}

#[test]
fn deadband_suppresses_servo_chatter() {
    let mut app = service();
    let mut hw = MockHardware::new();
    let clock = MockClock::unsynced();
    let mut sink = RecordingSink::new();

    // 20 raw counts apart — inside the 30-count deadband.
    hw.set_light(500, 520);
    app.tick(&mut hw, &clock, &mut sink);
    assert_eq!(hw.servo_call_count(), 0);

    // 31 counts apart — just outside.
    hw.set_light(500, 531);
    app.tick(&mut hw, &clock, &mut sink);
    assert_eq!(hw.servo_call_count(), 1);
}

#[test]
fn sensor_failure_holds_previous_angle() {
    let mut app = service();
    let mut hw = MockHardware::new();
    let clock = MockClock::unsynced();
    let mut sink = RecordingSink::new();

    hw.set_light(100, 900);
    app.tick(&mut hw, &clock, &mut sink);
    let held = app.applied_angle();
    assert_eq!(hw.servo_call_count(), 1);

    hw.sensor_fault = Some(sunblind::error::SensorError::AdcReadFailed);
    app.tick(&mut hw, &clock, &mut sink);
    assert_eq!(hw.servo_call_count(), 1, "no new servo command on a failed read");
    assert!((app.applied_angle() - held).abs() < f32::EPSILON);
}

#[test]
fn telemetry_unavailable_before_first_good_read() {
    let mut app = service();
    let mut hw = MockHardware::new();
    let clock = MockClock::unsynced();
    let mut sink = RecordingSink::new();

    assert!(app.build_telemetry().is_none());

    hw.sensor_fault = Some(sunblind::error::SensorError::DhtNoResponse);
    app.tick(&mut hw, &clock, &mut sink);
    assert!(app.build_telemetry().is_none());

    hw.sensor_fault = None;
    hw.set_light(200, 700);
    app.tick(&mut hw, &clock, &mut sink);
    let t = app.build_telemetry().expect("telemetry after a good read");
    assert!((t.temperature_c - 25.0).abs() < 0.01);
    assert!(t.intensity > 0.0 && t.intensity <= 1.0);
}

// ── Schedule ──────────────────────────────────────────────────

#[test]
fn schedule_fires_once_at_trigger_time() {
    let mut app = service();
    let mut hw = MockHardware::new();
    let clock = MockClock::at(1_900_000_000);
    let mut sink = RecordingSink::new();

    app.handle_command(
        sunblind::app::commands::Command::ArmSchedule(1_900_000_010),
        &mut hw,
        &mut sink,
    );
    assert!(app.schedule_armed());

    // Before the trigger: nothing.
    app.tick(&mut hw, &clock, &mut sink);
    assert!(!app.buzzer_on());

    // At the trigger: buzzer on, events emitted, schedule disarmed.
    clock.set(1_900_000_010);
    app.tick(&mut hw, &clock, &mut sink);
    assert!(app.buzzer_on());
    assert!(!app.schedule_armed());
    assert!(hw.calls.contains(&ActuatorCall::SetBuzzer(true)));
    assert_eq!(
        sink.count_of(|e| matches!(e, AppEvent::ScheduleFired { trigger_epoch: 1_900_000_010 })),
        1
    );

    // Later ticks do not re-fire.
    clock.set(1_900_000_100);
    app.tick(&mut hw, &clock, &mut sink);
    assert_eq!(sink.count_of(|e| matches!(e, AppEvent::ScheduleFired { .. })), 1);
}

#[test]
fn schedule_fires_even_if_exact_second_was_missed() {
    let mut app = service();
    let mut hw = MockHardware::new();
    let clock = MockClock::at(1_900_000_000);
    let mut sink = RecordingSink::new();

    app.handle_command(
        sunblind::app::commands::Command::ArmSchedule(1_900_000_005),
        &mut hw,
        &mut sink,
    );

    // The loop skips right past the trigger second.
    clock.set(1_900_000_007);
    app.tick(&mut hw, &clock, &mut sink);
    assert!(app.buzzer_on());
    assert!(!app.schedule_armed());
}

#[test]
fn schedule_waits_for_clock_sync() {
    let mut app = service();
    let mut hw = MockHardware::new();
    let clock = MockClock::unsynced();
    let mut sink = RecordingSink::new();

    app.handle_command(
        sunblind::app::commands::Command::ArmSchedule(1_900_000_000),
        &mut hw,
        &mut sink,
    );

    // Unsynced clock: the trigger stays armed no matter how many ticks pass.
    for _ in 0..10 {
        app.tick(&mut hw, &clock, &mut sink);
    }
    assert!(app.schedule_armed());
    assert!(!app.buzzer_on());

    // Clock syncs past the trigger: fires on the next tick.
    clock.set(1_900_000_042);
    app.tick(&mut hw, &clock, &mut sink);
    assert!(app.buzzer_on());
}

#[test]
fn schedule_fires_during_sensor_outage() {
    let mut app = service();
    let mut hw = MockHardware::new();
    let clock = MockClock::at(2_000_000_000);
    let mut sink = RecordingSink::new();

    app.handle_command(
        sunblind::app::commands::Command::ArmSchedule(2_000_000_001),
        &mut hw,
        &mut sink,
    );
    hw.sensor_fault = Some(sunblind::error::SensorError::AdcReadFailed);

    clock.set(2_000_000_001);
    app.tick(&mut hw, &clock, &mut sink);
    assert!(app.buzzer_on(), "schedule must fire even when sensors are down");
}

#[test]
fn rearming_after_fire_works() {
    let mut app = service();
    let mut hw = MockHardware::new();
    let clock = MockClock::at(1_000);
    let mut sink = RecordingSink::new();

    app.handle_command(sunblind::app::commands::Command::ArmSchedule(1_001), &mut hw, &mut sink);
    clock.set(1_001);
    app.tick(&mut hw, &clock, &mut sink);
    assert!(!app.schedule_armed());

    app.handle_command(sunblind::app::commands::Command::ArmSchedule(2_000), &mut hw, &mut sink);
    assert_eq!(app.schedule_trigger(), Some(2_000));
    clock.set(2_000);
    app.tick(&mut hw, &clock, &mut sink);
    assert_eq!(sink.count_of(|e| matches!(e, AppEvent::ScheduleFired { .. })), 2);
}

// ── Presets and tuning ────────────────────────────────────────

#[test]
fn preset_selection_echoes_config() {
    let mut app = service();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();

    app.handle_command(sunblind::app::commands::Command::SelectPreset('b'), &mut hw, &mut sink);
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::ConfigEchoed {
            min_angle: 45.0,
            controlling_factor: 0.3
        })
    );
}

#[test]
fn tuning_change_takes_effect_next_tick() {
    let mut app = service();
    let mut hw = MockHardware::new();
    let clock = MockClock::unsynced();
    let mut sink = RecordingSink::new();

    hw.set_light(300, 800);
    app.tick(&mut hw, &clock, &mut sink);
    let before = hw.last_angle().unwrap();

    app.handle_command(sunblind::app::commands::Command::SetMinAngle(60.0), &mut hw, &mut sink);
    app.tick(&mut hw, &clock, &mut sink);
    let after = hw.last_angle().unwrap();

    // min_angle 60, right bias 0.5: 30 + 120*(800/1023)*0.75 ≈ 100.38
    assert!((before - 102.977).abs() < 0.01);
    assert!((after - 100.381).abs() < 0.01, "got {after}");
}
