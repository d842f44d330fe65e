//! Integration tests for the full tick pipeline: edge detection → tally →
//! session-gated reporting, driven through mock network adapters.
//!
//! These run on the host (x86_64) and verify the cooperative-loop
//! contract end to end without any real hardware.

use super::mock_net::{MockDelay, MockLink, MockRecovery, MockSession, RecordingSink};
use piececounter::app::events::AppEvent;
use piececounter::app::service::CounterService;
use piececounter::config::CounterConfig;

/// Everything one test needs to drive the service tick by tick.
struct Harness {
    service: CounterService,
    link: MockLink,
    session: MockSession,
    delay: MockDelay,
    recovery: MockRecovery,
    sink: RecordingSink,
}

impl Harness {
    fn new(session_accepting: bool) -> Self {
        let config = CounterConfig::default();
        Self {
            service: CounterService::new(&config),
            link: MockLink::up(),
            session: MockSession::new(session_accepting),
            delay: MockDelay::new(),
            recovery: MockRecovery::new(),
            sink: RecordingSink::new(),
        }
    }

    fn tick(&mut self, now_ms: u32, level: bool) {
        self.service.tick(
            now_ms,
            level,
            &mut self.link,
            &mut self.session,
            &mut self.delay,
            &mut self.recovery,
            &mut self.sink,
        );
    }

    fn alive_count(&self) -> usize {
        self.session
            .payloads()
            .iter()
            .filter(|p| p.contains("\"status\":\"alive\""))
            .count()
    }
}

// ── Boot scenario: count offline, report after reconnect ─────

#[test]
fn boot_scenario_counts_offline_then_reports_on_reconnect() {
    let mut h = Harness::new(false);

    // Three rising edges at t=0, 50, 300 with a 200 ms window: the edge at
    // 50 is suppressed, so the tally ends at 2 — with zero publishes.
    h.tick(0, true);
    for t in [10, 20, 30, 40] {
        h.tick(t, false);
    }
    h.tick(50, true);
    h.tick(60, false);
    h.tick(300, true);
    h.tick(310, false);

    assert_eq!(h.service.count(), 2);
    assert!(h.session.published.is_empty());
    assert_eq!(
        h.sink
            .count_matching(|e| matches!(e, AppEvent::ReportDropped { .. })),
        2
    );

    // Broker comes up; the next due retry connects and announces online
    // with the counter accumulated while offline.
    h.session.accepting = true;
    h.tick(5_010, false);
    assert_eq!(
        h.session.payloads(),
        vec![r#"{"status":"online","counter":2,"topic":"factory/counter/line1"}"#]
    );

    // Keepalive fires one full interval after the online announcement.
    h.tick(65_010, false);
    assert_eq!(h.alive_count(), 0);
    h.tick(65_011, false);
    assert_eq!(
        h.session.payloads().last().copied(),
        Some(r#"{"status":"alive","counter":2,"uptime":65,"topic":"factory/counter/line1"}"#)
    );
}

// ── Event reports while connected ────────────────────────────

#[test]
fn piece_published_immediately_when_connected() {
    let mut h = Harness::new(true);

    // First tick connects the session and announces online.
    h.tick(0, false);
    assert_eq!(
        h.session.payloads(),
        vec![r#"{"status":"online","counter":0,"topic":"factory/counter/line1"}"#]
    );

    h.tick(10, true);
    assert_eq!(h.service.count(), 1);
    assert_eq!(
        h.session.payloads().last().copied(),
        Some(r#"{"detected":1,"counter":1,"timestamp":10,"topic":"factory/counter/line1"}"#)
    );
    // Published on the same topic the config names.
    assert_eq!(h.session.published.last().unwrap().0, "factory/counter/line1");
}

// ── Dropped reports are never backfilled ─────────────────────

#[test]
fn dropped_reports_are_not_backfilled() {
    let mut h = Harness::new(false);

    for (t, level) in [(0, true), (150, false), (300, true), (450, false), (600, true)] {
        h.tick(t, level);
    }
    assert_eq!(h.service.count(), 3);
    assert!(h.session.published.is_empty());

    h.session.accepting = true;
    h.tick(6_000, false);

    // Only the online announcement goes out — the three counted pieces
    // produce no retroactive event reports.
    assert_eq!(
        h.session.payloads(),
        vec![r#"{"status":"online","counter":3,"topic":"factory/counter/line1"}"#]
    );
}

// ── Keepalive cadence ─────────────────────────────────────────

#[test]
fn keepalive_fires_once_per_interval_while_connected() {
    let mut h = Harness::new(true);
    h.tick(0, false); // online at t=0, timer armed

    for t in (1_000..=200_000).step_by(1_000) {
        h.tick(t, false);
    }

    assert_eq!(h.alive_count(), 3);
    let uptimes: Vec<u32> = h
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::KeepaliveSent { uptime_secs, .. } => Some(*uptime_secs),
            _ => None,
        })
        .collect();
    assert_eq!(uptimes, vec![61, 122, 183]);
}

#[test]
fn outage_produces_no_keepalive_catchup_burst() {
    let mut h = Harness::new(true);
    h.tick(0, false); // online at t=0

    // Broker dies just after; the outage spans two whole keepalive periods.
    h.session.accepting = false;
    h.session.drop_session();
    for t in (1_000..140_000).step_by(1_000) {
        h.tick(t, false);
    }
    assert_eq!(h.alive_count(), 0);

    // Broker returns; find the reconnect tick.
    h.session.accepting = true;
    let mut online_at = 0;
    for t in (140_000..150_000).step_by(1_000) {
        h.tick(t, false);
        if h.service.session_connected() {
            online_at = t;
            break;
        }
    }
    assert!(online_at > 0, "session should reconnect once the broker is back");

    // No burst at reconnect: the timer was rearmed by the online
    // announcement, so the first keepalive comes one interval later.
    assert_eq!(h.alive_count(), 0);
    for t in ((online_at + 1_000)..=(online_at + 61_000)).step_by(1_000) {
        h.tick(t, false);
    }
    assert_eq!(h.alive_count(), 1);
}

// ── Session service step ──────────────────────────────────────

#[test]
fn session_service_runs_every_tick_only_while_connected() {
    let mut h = Harness::new(true);
    h.tick(0, false);
    assert_eq!(h.session.service_calls, 1);

    for t in (1_000..=10_000).step_by(1_000) {
        h.tick(t, false);
    }
    assert_eq!(h.session.service_calls, 11);

    h.session.accepting = false;
    h.session.drop_session();
    for t in (11_000..=13_000).step_by(1_000) {
        h.tick(t, false);
    }
    assert_eq!(h.session.service_calls, 11, "no service calls while down");
}

// ── Counter reset ─────────────────────────────────────────────

#[test]
fn reset_is_the_only_decrement() {
    let mut h = Harness::new(false);
    h.tick(0, true);
    h.tick(250, false);
    h.tick(500, true);
    assert_eq!(h.service.count(), 2);

    assert_eq!(h.service.reset_count(), 2);
    assert_eq!(h.service.count(), 0);

    h.tick(1_000, false);
    h.tick(1_010, true);
    assert_eq!(h.service.count(), 1);
}

// ── Non-blocking guarantees ───────────────────────────────────

#[test]
fn session_and_reporter_paths_never_block() {
    let mut h = Harness::new(false);

    // A healthy link and a permanently refusing broker: every tick goes
    // through session retries and report paths, none of which may delay.
    for t in (0..30_000).step_by(250) {
        h.tick(t, t % 1_000 == 0);
    }
    assert_eq!(h.delay.calls, 0);
    assert!(h.recovery.restarts.is_empty());
}

// ── Publish failures are transient ───────────────────────────

#[test]
fn publish_failure_does_not_stop_counting() {
    let mut h = Harness::new(true);
    h.session.fail_publish = true;

    h.tick(0, false); // connects; online publish fails
    h.tick(10, true); // piece counted; event publish fails

    assert_eq!(h.service.count(), 1);
    assert!(h.session.published.is_empty());
    assert!(h.recovery.restarts.is_empty());

    // Broker recovers; the next piece goes out normally.
    h.session.fail_publish = false;
    h.tick(300, false);
    h.tick(310, true);
    assert_eq!(h.service.count(), 2);
    assert_eq!(
        h.session.payloads(),
        vec![r#"{"detected":1,"counter":2,"timestamp":310,"topic":"factory/counter/line1"}"#]
    );
}
