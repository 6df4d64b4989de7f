//! End-to-end command flow: broker message → classify → parse → service
//! dispatch → actuators and published echoes.

use sunblind::adapters::mqtt::MqttAdapter;
use sunblind::app::commands::{classify, Command};
use sunblind::app::events::AppEvent;
use sunblind::app::ports::{ActuatorPort, EventSink};
use sunblind::app::service::AppService;
use sunblind::config::{SystemConfig, TopicConfig};

use crate::mock_hw::{ActuatorCall, MockHardware, RecordingSink};

/// Run one raw `(topic, payload)` message through the full decode path.
fn dispatch(
    app: &mut AppService,
    hw: &mut MockHardware,
    sink: &mut RecordingSink,
    topics: &TopicConfig,
    topic: &str,
    payload: &str,
) -> Result<(), sunblind::error::ParseError> {
    let kind = classify(topics, topic).expect("test uses known topics");
    let cmd = Command::parse(kind, payload)?;
    app.handle_command(cmd, hw, sink);
    Ok(())
}

#[test]
fn buzzer_message_reaches_actuator() {
    let config = SystemConfig::default();
    let mut app = AppService::new(&config);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();

    dispatch(&mut app, &mut hw, &mut sink, &config.topics, "MQTT-ON-OFF", "1").unwrap();
    assert_eq!(hw.last_call(), Some(&ActuatorCall::SetBuzzer(true)));
    assert!(hw.is_buzzer_on());

    dispatch(&mut app, &mut hw, &mut sink, &config.topics, "MQTT-ON-OFF", "0").unwrap();
    assert_eq!(hw.last_call(), Some(&ActuatorCall::SetBuzzer(false)));
    assert!(!hw.is_buzzer_on());
}

#[test]
fn malformed_payload_leaves_config_untouched() {
    let config = SystemConfig::default();
    let mut app = AppService::new(&config);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();

    let before = *app.tuning();
    let result = dispatch(&mut app, &mut hw, &mut sink, &config.topics, "MQTT-MIN-ANG", "abc");
    assert!(result.is_err());
    assert_eq!(*app.tuning(), before, "tuning must not change on a parse error");
    assert!(hw.calls.is_empty());
}

#[test]
fn schedule_disarm_via_sentinel() {
    let config = SystemConfig::default();
    let mut app = AppService::new(&config);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();

    dispatch(
        &mut app,
        &mut hw,
        &mut sink,
        &config.topics,
        "MQTT-SCH-ON",
        "1900000000",
    )
    .unwrap();
    assert!(app.schedule_armed());

    dispatch(&mut app, &mut hw, &mut sink, &config.topics, "MQTT-SCH-ON", "N").unwrap();
    assert!(!app.schedule_armed());
}

#[test]
fn inbound_queue_to_preset_echo_round_trip() {
    let config = SystemConfig::default();
    let mut app = AppService::new(&config);
    let mut hw = MockHardware::new();
    let mut mqtt = MqttAdapter::new(
        config.topics.clone(),
        &config.broker_host,
        config.broker_port,
        &config.client_id,
    );
    mqtt.connect().unwrap();

    // Broker delivers a preset selection.
    mqtt.sim_inject("MQTT-DROP-DOWN", "B");

    // Main-loop drain: decode and dispatch, echoing through the MQTT sink.
    while let Some(msg) = mqtt.poll_inbound() {
        let kind = classify(&config.topics, &msg.topic).unwrap();
        let cmd = Command::parse(kind, &msg.payload).unwrap();
        let mut echo = RecordingSink::new();
        app.handle_command(cmd, &mut hw, &mut echo);
        for event in &echo.events {
            mqtt.emit(event);
        }
    }

    assert_eq!(app.tuning().min_angle, 45.0);
    let published = mqtt.sim_take_published();
    assert_eq!(published[0], ("MQTT-SET-ANG".to_owned(), "45.00".to_owned()));
    assert_eq!(published[1], ("MQTT-SET-FAC".to_owned(), "0.30".to_owned()));
}

#[test]
fn schedule_fire_publishes_disarm_ack() {
    let config = SystemConfig::default();
    let mut mqtt = MqttAdapter::new(
        config.topics.clone(),
        &config.broker_host,
        config.broker_port,
        &config.client_id,
    );
    mqtt.connect().unwrap();

    mqtt.emit(&AppEvent::ScheduleFired {
        trigger_epoch: 1_900_000_000,
    });
    assert_eq!(
        mqtt.sim_take_published(),
        vec![("MQTT-SCH-ON".to_owned(), "N".to_owned())]
    );
}
