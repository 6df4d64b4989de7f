//! Main-loop event queue.
//!
//! Events are produced by the loop's own timers (control and telemetry
//! ticks) and by the MQTT receive callback, which runs on the broker
//! client's task — so the queue has **multiple producers** and a single
//! consumer.  Producers reserve a slot with a compare-exchange on the head
//! index and then publish the event into that slot; the consumer treats a
//! reserved-but-unwritten slot as "not yet" and retries next cycle.

use core::sync::atomic::{AtomicU8, Ordering};

/// Maximum number of pending events.
/// Power of 2 for efficient ring buffer modulo.
const EVENT_QUEUE_CAP: usize = 16;

/// System event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Event {
    /// Control loop tick (1 Hz): read sensors, position the shade, check
    /// the schedule.
    ControlTick = 0,
    /// Telemetry report timer fired.
    TelemetryTick = 1,
    /// The broker callback queued one or more inbound command messages.
    CommandReceived = 2,
}

// ── Lock-free MPSC ring buffer ────────────────────────────────
//
// Each slot is an atomic byte: 0 = empty, otherwise the event
// discriminant + 1.  A producer CAS-advances the head to claim a slot,
// then stores the tagged value; the consumer swaps the slot back to 0
// before advancing the tail, so a claimed slot whose store has not
// landed yet reads as empty and is simply retried.

static EVENT_HEAD: AtomicU8 = AtomicU8::new(0);
static EVENT_TAIL: AtomicU8 = AtomicU8::new(0);
static EVENT_SLOTS: [AtomicU8; EVENT_QUEUE_CAP] =
    [const { AtomicU8::new(0) }; EVENT_QUEUE_CAP];

/// Push an event into the queue.
/// Safe to call from any callback context (lock-free, multi-producer).
/// Returns `false` if the queue is full (event dropped).
pub fn push_event(event: Event) -> bool {
    let mut head = EVENT_HEAD.load(Ordering::Relaxed);
    loop {
        let tail = EVENT_TAIL.load(Ordering::Acquire);
        let next_head = (head + 1) % EVENT_QUEUE_CAP as u8;

        if next_head == tail {
            return false; // Queue full — drop event.
        }

        // Claim the slot at `head`; on contention another producer took it,
        // so retry with the updated head.
        match EVENT_HEAD.compare_exchange_weak(
            head,
            next_head,
            Ordering::AcqRel,
            Ordering::Relaxed,
        ) {
            Ok(_) => {
                EVENT_SLOTS[head as usize].store(event as u8 + 1, Ordering::Release);
                return true;
            }
            Err(current) => head = current,
        }
    }
}

/// Pop the next event from the queue.
/// Called from the main loop (single consumer).
pub fn pop_event() -> Option<Event> {
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    let head = EVENT_HEAD.load(Ordering::Acquire);

    if tail == head {
        return None; // Empty.
    }

    let raw = EVENT_SLOTS[tail as usize].swap(0, Ordering::Acquire);
    if raw == 0 {
        // The slot is claimed but the producer's store has not landed yet;
        // report empty and pick it up on the next drain.
        return None;
    }

    EVENT_TAIL.store((tail + 1) % EVENT_QUEUE_CAP as u8, Ordering::Release);
    event_from_u8(raw - 1)
}

/// Drain all pending events into a callback, FIFO order.
pub fn drain_events(mut handler: impl FnMut(Event)) {
    while let Some(event) = pop_event() {
        handler(event);
    }
}

pub fn queue_is_empty() -> bool {
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    let head = EVENT_HEAD.load(Ordering::Acquire);
    tail == head
}

fn event_from_u8(raw: u8) -> Option<Event> {
    match raw {
        0 => Some(Event::ControlTick),
        1 => Some(Event::TelemetryTick),
        2 => Some(Event::CommandReceived),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    // The queue is a process-wide static, so tests touching it must not
    // run concurrently.
    static QUEUE_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    fn drain_all() {
        while pop_event().is_some() {}
    }

    #[test]
    fn fifo_order_preserved() {
        let _guard = QUEUE_LOCK.lock().unwrap();
        drain_all();
        assert!(push_event(Event::ControlTick));
        assert!(push_event(Event::TelemetryTick));
        assert!(push_event(Event::CommandReceived));

        let mut seen = Vec::new();
        drain_events(|e| seen.push(e));
        assert_eq!(
            seen,
            vec![Event::ControlTick, Event::TelemetryTick, Event::CommandReceived]
        );
        assert!(queue_is_empty());
    }

    #[test]
    fn full_queue_drops_new_events() {
        let _guard = QUEUE_LOCK.lock().unwrap();
        drain_all();
        // Capacity is CAP - 1 because one slot stays empty to distinguish
        // full from empty.
        for _ in 0..EVENT_QUEUE_CAP - 1 {
            assert!(push_event(Event::ControlTick));
        }
        assert!(!push_event(Event::TelemetryTick));
        drain_all();
    }

    #[test]
    fn concurrent_producers_lose_no_accepted_events() {
        let _guard = QUEUE_LOCK.lock().unwrap();
        drain_all();

        // Two producers model the main loop's timers and the broker
        // callback pushing from its own task.  Every push that reported
        // `true` must come out of the consumer exactly once.
        const PUSHES_PER_PRODUCER: usize = 200_000;

        let done = Arc::new(AtomicBool::new(false));
        let producers: Vec<_> = [Event::ControlTick, Event::CommandReceived]
            .into_iter()
            .map(|event| {
                std::thread::spawn(move || {
                    let mut accepted = 0usize;
                    for _ in 0..PUSHES_PER_PRODUCER {
                        if push_event(event) {
                            accepted += 1;
                        }
                    }
                    accepted
                })
            })
            .collect();

        let consumer = {
            let done = Arc::clone(&done);
            std::thread::spawn(move || {
                let mut drained = 0usize;
                while !done.load(Ordering::Acquire) || !queue_is_empty() {
                    if pop_event().is_some() {
                        drained += 1;
                    }
                }
                // A claimed-but-unwritten slot reads as empty; one final
                // sweep picks up anything published after the last check.
                while pop_event().is_some() {
                    drained += 1;
                }
                drained
            })
        };

        let accepted: usize = producers.into_iter().map(|p| p.join().unwrap()).sum();
        done.store(true, Ordering::Release);
        let drained = consumer.join().unwrap();

        assert_eq!(drained, accepted, "every accepted event must be delivered");
        assert!(queue_is_empty());
    }
}
