//! Outbound report formatting and emission.
//!
//! Three fixed-shape JSON payloads, all carrying the topic identifier so
//! downstream bridges can route without inspecting the broker envelope:
//!
//! - event:     `{"detected":1,"counter":N,"timestamp":T,"topic":"..."}`
//! - keepalive: `{"status":"alive","counter":N,"uptime":U,"topic":"..."}`
//! - online:    `{"status":"online","counter":N,"topic":"..."}`
//!
//! Both emission paths are gated on a connected session. Events detected
//! while the session is down are logged and dropped — there is no offline
//! buffering; the running counter itself is never lost, only the report.
//! The keepalive timer is rearmed by the online announcement and advances
//! only when it fires, so an outage never produces a catch-up burst: the
//! first keepalive after a reconnect comes one full interval later.

use log::{info, warn};
use serde::Serialize;

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, SessionPort};
use crate::config::CounterConfig;
use crate::counter::PieceEvent;

// ───────────────────────────────────────────────────────────────
// Wire payloads (field order is the wire contract)
// ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct EventReport<'a> {
    detected: u8,
    counter: u32,
    timestamp: u32,
    topic: &'a str,
}

#[derive(Serialize)]
struct KeepaliveReport<'a> {
    status: &'a str,
    counter: u32,
    uptime: u32,
    topic: &'a str,
}

#[derive(Serialize)]
struct OnlineReport<'a> {
    status: &'a str,
    counter: u32,
    topic: &'a str,
}

// ───────────────────────────────────────────────────────────────
// Reporter
// ───────────────────────────────────────────────────────────────

/// Formats and publishes the three report kinds.
pub struct Reporter {
    topic: heapless::String<64>,
    keepalive_interval_ms: u32,
    last_fire_ms: u32,
    /// False until the first online announcement arms the liveness timer.
    keepalive_armed: bool,
}

impl Reporter {
    pub fn new(config: &CounterConfig) -> Self {
        Self {
            topic: config.topic.clone(),
            keepalive_interval_ms: config.keepalive_interval_ms,
            last_fire_ms: 0,
            keepalive_armed: false,
        }
    }

    /// Topic identifier carried in every payload.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Publish one per-piece event report, or drop it if the session is
    /// down. The tally has already been incremented either way.
    pub fn publish_event(
        &mut self,
        session: &mut impl SessionPort,
        event: &PieceEvent,
        count: u32,
        sink: &mut impl EventSink,
    ) {
        if !session.is_connected() {
            warn!(
                "report: piece #{} at t={}ms dropped (session down)",
                count, event.timestamp_ms
            );
            sink.emit(&AppEvent::ReportDropped { count });
            return;
        }

        let report = EventReport {
            detected: 1,
            counter: count,
            timestamp: event.timestamp_ms,
            topic: &self.topic,
        };
        self.publish(session, &report, "event");
    }

    /// Publish the online announcement and rearm the keepalive timer.
    /// Called by the service when the session (re)connects.
    pub fn publish_online(
        &mut self,
        now_ms: u32,
        session: &mut impl SessionPort,
        count: u32,
        sink: &mut impl EventSink,
    ) {
        let report = OnlineReport {
            status: "online",
            counter: count,
            topic: &self.topic,
        };
        self.publish(session, &report, "online");
        self.last_fire_ms = now_ms;
        self.keepalive_armed = true;
        sink.emit(&AppEvent::SessionOnline { count });
    }

    /// Fire the liveness report when due. Only fires while the session is
    /// connected; the schedule advances on fire regardless of whether the
    /// publish itself succeeded, so a flaky broker cannot cause a burst.
    pub fn maybe_keepalive(
        &mut self,
        now_ms: u32,
        session: &mut impl SessionPort,
        count: u32,
        uptime_secs: u32,
        sink: &mut impl EventSink,
    ) {
        if !self.keepalive_armed || !session.is_connected() {
            return;
        }
        if now_ms.wrapping_sub(self.last_fire_ms) <= self.keepalive_interval_ms {
            return;
        }

        let report = KeepaliveReport {
            status: "alive",
            counter: count,
            uptime: uptime_secs,
            topic: &self.topic,
        };
        self.publish(session, &report, "keepalive");
        self.last_fire_ms = now_ms;
        sink.emit(&AppEvent::KeepaliveSent { count, uptime_secs });
    }

    // ── Internal ──────────────────────────────────────────────

    fn publish(&self, session: &mut impl SessionPort, report: &impl Serialize, kind: &str) {
        let payload = match serde_json::to_vec(report) {
            Ok(p) => p,
            Err(e) => {
                warn!("report: failed to serialize {} payload — {}", kind, e);
                return;
            }
        };
        match session.publish(&self.topic, &payload) {
            Ok(()) => info!("report: {} published ({} bytes)", kind, payload.len()),
            Err(e) => warn!("report: {} publish failed — {}", kind, e),
        }
    }
}
