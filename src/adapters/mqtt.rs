//! MQTT adapter — broker link for telemetry out and commands in.
//!
//! Implements [`EventSink`] for the broker-facing copy of each application
//! event, and queues inbound command messages for the main loop to drain.
//! The broker callback only copies bytes and enqueues; all decoding happens
//! on the main task via [`crate::app::commands`].
//!
//! Connection loss follows the same bounded exponential backoff as the WiFi
//! adapter (2 s doubling to a 60 s cap), pumped by `poll()` once per cycle.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use log::{error, info, warn};
use serde::Serialize;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::config::TopicConfig;
use crate::error::CommsError;

/// Longest topic or payload the broker link accepts; anything larger is
/// dropped with a warning.
pub const MAX_MSG_LEN: usize = 64;

/// A raw inbound MQTT message, copied out of the broker callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: heapless::String<MAX_MSG_LEN>,
    pub payload: heapless::String<MAX_MSG_LEN>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MqttState {
    Disconnected,
    Connected,
    Reconnecting { attempt: u32 },
}

const INITIAL_BACKOFF_SECS: u32 = 2;
const MAX_BACKOFF_SECS: u32 = 60;

/// Wire form of the light-intensity report.
#[derive(Serialize)]
struct IntensityReport<'a> {
    side: &'a str,
    value: &'a str,
}

type InboundQueue = Arc<Mutex<VecDeque<InboundMessage>>>;

pub struct MqttAdapter {
    topics: TopicConfig,
    broker_host: String,
    broker_port: u16,
    client_id: String,
    state: MqttState,
    backoff_secs: u32,
    cooldown: u32,
    inbound: InboundQueue,
    #[cfg(target_os = "espidf")]
    client: Option<esp_idf_svc::mqtt::client::EspMqttClient<'static>>,
    #[cfg(not(target_os = "espidf"))]
    sim_fail: bool,
    #[cfg(not(target_os = "espidf"))]
    sim_published: Vec<(String, String)>,
}

impl MqttAdapter {
    pub fn new(topics: TopicConfig, broker_host: &str, broker_port: u16, client_id: &str) -> Self {
        Self {
            topics,
            broker_host: broker_host.to_owned(),
            broker_port,
            client_id: client_id.to_owned(),
            state: MqttState::Disconnected,
            backoff_secs: INITIAL_BACKOFF_SECS,
            cooldown: 0,
            inbound: Arc::new(Mutex::new(VecDeque::new())),
            #[cfg(target_os = "espidf")]
            client: None,
            #[cfg(not(target_os = "espidf"))]
            sim_fail: false,
            #[cfg(not(target_os = "espidf"))]
            sim_published: Vec::new(),
        }
    }

    pub fn state(&self) -> MqttState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == MqttState::Connected
    }

    pub fn backoff_secs(&self) -> u32 {
        self.backoff_secs
    }

    /// Connect and subscribe to all command topics.
    pub fn connect(&mut self) -> Result<(), CommsError> {
        info!(
            "MQTT: connecting to {}:{} as '{}'",
            self.broker_host, self.broker_port, self.client_id
        );
        match self.platform_connect() {
            Ok(()) => {
                self.state = MqttState::Connected;
                self.backoff_secs = INITIAL_BACKOFF_SECS;
                self.subscribe_commands()?;
                info!("MQTT: connected");
                Ok(())
            }
            Err(e) => {
                error!("MQTT: connection failed — {}", e);
                self.enter_reconnect(0);
                Err(e)
            }
        }
    }

    /// Non-blocking reconnect pump; call once per control cycle.
    pub fn poll(&mut self) {
        match self.state {
            MqttState::Reconnecting { attempt } => {
                if self.cooldown > 0 {
                    self.cooldown -= 1;
                    return;
                }
                info!("MQTT: reconnect attempt {}", attempt + 1);
                match self.platform_connect() {
                    Ok(()) => {
                        self.state = MqttState::Connected;
                        self.backoff_secs = INITIAL_BACKOFF_SECS;
                        if self.subscribe_commands().is_ok() {
                            info!("MQTT: reconnected");
                        }
                    }
                    Err(_) => {
                        self.backoff_secs = (self.backoff_secs * 2).min(MAX_BACKOFF_SECS);
                        self.enter_reconnect(attempt + 1);
                    }
                }
            }
            MqttState::Connected | MqttState::Disconnected => {}
        }
    }

    fn enter_reconnect(&mut self, attempt: u32) {
        self.cooldown = self.backoff_secs;
        self.state = MqttState::Reconnecting { attempt };
    }

    /// Drain one queued inbound message, oldest first.
    pub fn poll_inbound(&mut self) -> Option<InboundMessage> {
        match self.inbound.lock() {
            Ok(mut q) => q.pop_front(),
            Err(_) => None,
        }
    }

    fn subscribe_commands(&mut self) -> Result<(), CommsError> {
        let topics = [
            self.topics.cmd_buzzer.clone(),
            self.topics.cmd_schedule.clone(),
            self.topics.cmd_min_angle.clone(),
            self.topics.cmd_control_factor.clone(),
            self.topics.cmd_preset.clone(),
        ];
        for topic in &topics {
            self.platform_subscribe(topic)?;
        }
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &str) {
        if self.state != MqttState::Connected {
            return;
        }
        if let Err(e) = self.platform_publish(topic, payload) {
            warn!("MQTT: publish to '{}' failed — {}", topic, e);
            self.enter_reconnect(0);
        }
    }

    /// Copy a raw broker message into the inbound queue.  Shared by the
    /// espidf callback and the simulation injector.
    fn enqueue_inbound(queue: &InboundQueue, topic: &str, payload: &[u8]) {
        let Ok(payload) = core::str::from_utf8(payload) else {
            warn!("MQTT: dropping non-UTF-8 payload on '{}'", topic);
            return;
        };
        let (Ok(topic), Ok(payload)) = (
            heapless::String::try_from(topic),
            heapless::String::try_from(payload),
        ) else {
            warn!("MQTT: dropping oversized message on inbound queue");
            return;
        };
        if let Ok(mut q) = queue.lock() {
            q.push_back(InboundMessage { topic, payload });
        }
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self) -> Result<(), CommsError> {
        use esp_idf_svc::mqtt::client::{EspMqttClient, EventPayload, MqttClientConfiguration};

        let url = format!("mqtt://{}:{}", self.broker_host, self.broker_port);
        let conf = MqttClientConfiguration {
            client_id: Some(&self.client_id),
            ..Default::default()
        };
        let inbound = Arc::clone(&self.inbound);
        let client = EspMqttClient::new_cb(&url, &conf, move |event| {
            if let EventPayload::Received {
                topic: Some(topic),
                data,
                ..
            } = event.payload()
            {
                Self::enqueue_inbound(&inbound, topic, data);
                crate::events::push_event(crate::events::Event::CommandReceived);
            }
        })
        .map_err(|_| CommsError::MqttConnectFailed)?;
        self.client = Some(client);
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self) -> Result<(), CommsError> {
        if self.sim_fail {
            return Err(CommsError::MqttConnectFailed);
        }
        info!("MQTT(sim): connected to {}:{}", self.broker_host, self.broker_port);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_subscribe(&mut self, topic: &str) -> Result<(), CommsError> {
        use esp_idf_svc::mqtt::client::QoS;

        let client = self.client.as_mut().ok_or(CommsError::MqttConnectFailed)?;
        client
            .subscribe(topic, QoS::AtLeastOnce)
            .map_err(|_| CommsError::MqttConnectFailed)?;
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_subscribe(&mut self, topic: &str) -> Result<(), CommsError> {
        info!("MQTT(sim): subscribed to '{}'", topic);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_publish(&mut self, topic: &str, payload: &str) -> Result<(), CommsError> {
        use esp_idf_svc::mqtt::client::QoS;

        let client = self.client.as_mut().ok_or(CommsError::MqttPublishFailed)?;
        client
            .publish(topic, QoS::AtMostOnce, false, payload.as_bytes())
            .map_err(|_| CommsError::MqttPublishFailed)?;
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_publish(&mut self, topic: &str, payload: &str) -> Result<(), CommsError> {
        if self.sim_fail {
            return Err(CommsError::MqttPublishFailed);
        }
        self.sim_published.push((topic.to_owned(), payload.to_owned()));
        Ok(())
    }

    // ── Simulation hooks ──────────────────────────────────────

    /// Inject a broker message, as if it arrived from a subscription.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_inject(&mut self, topic: &str, payload: &str) {
        Self::enqueue_inbound(&self.inbound, topic, payload.as_bytes());
    }

    /// Force every connect and publish to fail.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_failing(&mut self, failing: bool) {
        self.sim_fail = failing;
    }

    /// Drain everything published so far as `(topic, payload)` pairs.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_take_published(&mut self) -> Vec<(String, String)> {
        core::mem::take(&mut self.sim_published)
    }
}

// ── EventSink: application events → broker topics ─────────────

impl EventSink for MqttAdapter {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                let temp_topic = self.topics.pub_temperature.clone();
                self.publish(&temp_topic, &format!("{:.2}", t.temperature_c));

                let value = format!("{:.2}", t.intensity);
                let report = IntensityReport {
                    side: t.dominant.label(),
                    value: &value,
                };
                match serde_json::to_string(&report) {
                    Ok(json) => {
                        let topic = self.topics.pub_intensity.clone();
                        self.publish(&topic, &json);
                    }
                    Err(e) => warn!("MQTT: intensity encode failed — {}", e),
                }

                let angle_topic = self.topics.pub_servo_angle.clone();
                self.publish(&angle_topic, &format!("{:.2}", t.angle_degrees));
            }
            AppEvent::ConfigEchoed {
                min_angle,
                controlling_factor,
            } => {
                let angle_topic = self.topics.pub_angle_echo.clone();
                self.publish(&angle_topic, &format!("{:.2}", min_angle));
                let factor_topic = self.topics.pub_factor_echo.clone();
                self.publish(&factor_topic, &format!("{:.2}", controlling_factor));
            }
            AppEvent::ScheduleFired { .. } => {
                // Acknowledge on the schedule command topic so the dashboard
                // toggle resets; 'N' is the disarm sentinel.
                let topic = self.topics.cmd_schedule.clone();
                self.publish(&topic, "N");
            }
            AppEvent::BuzzerChanged { .. } | AppEvent::Started => {}
        }
    }
}
