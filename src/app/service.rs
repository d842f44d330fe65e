//! Application service — the hexagonal core.
//!
//! [`CounterService`] owns the edge detector, the tally, both connectivity
//! supervisors, and the reporter. It exposes a clean, hardware-agnostic
//! API. All I/O flows through port traits injected at call sites, making
//! the entire service testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌─────────────────────────────┐ ──▶ SessionPort
//!                 │       CounterService         │
//!    LinkPort ◀───│  edge · tally · supervisors  │──▶ EventSink
//!                 └─────────────────────────────┘
//! ```
//!
//! Per-tick ordering is a hard contract: link maintenance runs before
//! session maintenance, which runs before event detection — so a link
//! restored this tick is already available to a same-tick publish.

use embedded_hal::delay::DelayNs;
use log::info;

use crate::config::CounterConfig;
use crate::counter::{EdgeDetector, Tally};
use crate::report::Reporter;
use crate::supervisor::{LinkSupervisor, SessionPoll, SessionSupervisor};

use super::events::AppEvent;
use super::ports::{EventSink, LinkPort, RecoveryPort, SessionPort};

/// The application service orchestrates all domain logic.
///
/// Everything is owned by this single struct and mutated from one
/// execution context; no locking is needed. A port of this core onto
/// real parallelism must put the tally and the timer fields behind a
/// mutex or atomics and preserve the tick ordering as a logical order.
pub struct CounterService {
    edge: EdgeDetector,
    tally: Tally,
    link_sup: LinkSupervisor,
    session_sup: SessionSupervisor,
    reporter: Reporter,
    tick_count: u64,
}

impl CounterService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch the network — call [`start`](Self::start) next.
    pub fn new(config: &CounterConfig) -> Self {
        Self {
            edge: EdgeDetector::new(config.debounce_ms),
            tally: Tally::new(),
            link_sup: LinkSupervisor::new(config),
            session_sup: SessionSupervisor::new(config),
            reporter: Reporter::new(config),
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Boot-time bring-up: blocking bounded link connect, then one session
    /// attempt (success publishes the online announcement immediately).
    pub fn start(
        &mut self,
        now_ms: u32,
        link: &mut impl LinkPort,
        session: &mut impl SessionPort,
        delay: &mut impl DelayNs,
        recovery: &mut impl RecoveryPort,
        sink: &mut impl EventSink,
    ) {
        sink.emit(&AppEvent::Started {
            count: self.tally.count(),
        });
        self.link_sup.bring_up(now_ms, link, delay, recovery, sink);
        if self.session_sup.ensure_connected(now_ms, session, sink) == SessionPoll::CameOnline {
            self.reporter
                .publish_online(now_ms, session, self.tally.count(), sink);
        }
        info!("counter service started");
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle:
    /// link check → session check → session service → keepalive → edge
    /// sample and report.
    pub fn tick(
        &mut self,
        now_ms: u32,
        raw_level: bool,
        link: &mut impl LinkPort,
        session: &mut impl SessionPort,
        delay: &mut impl DelayNs,
        recovery: &mut impl RecoveryPort,
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;

        // 1. Link watchdog (coarse interval; may block in bounded recovery).
        self.link_sup
            .check_and_maintain(now_ms, link, delay, recovery, sink);

        // 2. Session watchdog (non-blocking, rate-limited).
        if self.session_sup.ensure_connected(now_ms, session, sink) == SessionPoll::CameOnline {
            self.reporter
                .publish_online(now_ms, session, self.tally.count(), sink);
        }

        // 3. Drive the client's internal I/O while connected.
        if session.is_connected() {
            session.service();
        }

        // 4. Periodic liveness report.
        self.reporter
            .maybe_keepalive(now_ms, session, self.tally.count(), now_ms / 1000, sink);

        // 5. Sample the sensor line; count and report debounced edges.
        if let Some(event) = self.edge.sample(raw_level, now_ms) {
            let count = self.tally.increment();
            info!("piece #{} at t={}ms", count, event.timestamp_ms);
            sink.emit(&AppEvent::PieceDetected {
                count,
                timestamp_ms: event.timestamp_ms,
            });
            self.reporter.publish_event(session, &event, count, sink);
        }
    }

    // ── Queries and commands ──────────────────────────────────

    /// Running piece count.
    pub fn count(&self) -> u32 {
        self.tally.count()
    }

    /// Explicitly clear the tally (the only decrement); returns the value
    /// it held. For deployments reporting per-cycle counts.
    pub fn reset_count(&mut self) -> u32 {
        let held = self.tally.reset();
        info!("tally reset (was {})", held);
        held
    }

    /// Whether the link supervisor last observed the link up.
    pub fn link_connected(&self) -> bool {
        self.link_sup.is_connected()
    }

    /// Whether the session supervisor last observed the session up.
    pub fn session_connected(&self) -> bool {
        self.session_sup.is_connected()
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
