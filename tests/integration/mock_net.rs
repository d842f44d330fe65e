//! Mock network and platform adapters for integration tests.
//!
//! Records every port call so tests can assert on the full interaction
//! history without touching real drivers, sockets, or clocks.

use core::net::Ipv4Addr;

use embedded_hal::delay::DelayNs;
use piececounter::app::events::AppEvent;
use piececounter::app::ports::{
    EventSink, LinkError, LinkPort, RecoveryPort, SessionError, SessionPort,
};

// ── MockLink ──────────────────────────────────────────────────

/// Link driver double. A connect request either never completes
/// (`available = false`) or completes after `polls_to_join` status polls.
pub struct MockLink {
    pub joined: bool,
    pub available: bool,
    pub polls_to_join: u32,
    join_countdown: Option<u32>,
    pub connect_calls: u32,
    pub disconnect_calls: u32,
}

#[allow(dead_code)]
impl MockLink {
    pub fn up() -> Self {
        Self {
            joined: true,
            available: true,
            polls_to_join: 0,
            join_countdown: None,
            connect_calls: 0,
            disconnect_calls: 0,
        }
    }

    pub fn down(available: bool, polls_to_join: u32) -> Self {
        Self {
            joined: false,
            available,
            polls_to_join,
            join_countdown: None,
            connect_calls: 0,
            disconnect_calls: 0,
        }
    }

    /// Simulate the driver losing the link out from under us.
    pub fn drop_link(&mut self) {
        self.joined = false;
        self.join_countdown = None;
    }
}

impl LinkPort for MockLink {
    fn connect(&mut self) -> Result<(), LinkError> {
        self.connect_calls += 1;
        self.join_countdown = self.available.then_some(self.polls_to_join);
        Ok(())
    }

    fn disconnect(&mut self) {
        self.disconnect_calls += 1;
        self.joined = false;
        self.join_countdown = None;
    }

    fn is_connected(&mut self) -> bool {
        if self.joined {
            return true;
        }
        match self.join_countdown {
            Some(0) => {
                self.joined = true;
                self.join_countdown = None;
                true
            }
            Some(n) => {
                self.join_countdown = Some(n - 1);
                false
            }
            None => false,
        }
    }

    fn local_address(&self) -> Option<Ipv4Addr> {
        self.joined.then_some(Ipv4Addr::new(10, 0, 0, 7))
    }
}

// ── MockSession ───────────────────────────────────────────────

/// Session client double. Connects succeed only while `accepting`;
/// every publish and service call is recorded.
pub struct MockSession {
    pub accepting: bool,
    pub connected: bool,
    pub fail_publish: bool,
    pub connect_calls: u32,
    pub service_calls: u32,
    pub published: Vec<(String, String)>,
}

#[allow(dead_code)]
impl MockSession {
    pub fn new(accepting: bool) -> Self {
        Self {
            accepting,
            connected: false,
            fail_publish: false,
            connect_calls: 0,
            service_calls: 0,
            published: Vec::new(),
        }
    }

    /// Simulate the broker dropping the session.
    pub fn drop_session(&mut self) {
        self.connected = false;
    }

    pub fn payloads(&self) -> Vec<&str> {
        self.published.iter().map(|(_, p)| p.as_str()).collect()
    }
}

impl SessionPort for MockSession {
    fn connect(&mut self) -> Result<(), SessionError> {
        self.connect_calls += 1;
        if self.accepting {
            self.connected = true;
            Ok(())
        } else {
            Err(SessionError::Refused(-2))
        }
    }

    fn is_connected(&mut self) -> bool {
        self.connected
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), SessionError> {
        if !self.connected {
            return Err(SessionError::NotConnected);
        }
        if self.fail_publish {
            return Err(SessionError::PublishFailed);
        }
        self.published.push((
            topic.to_string(),
            String::from_utf8(payload.to_vec()).expect("payloads are JSON"),
        ));
        Ok(())
    }

    fn service(&mut self) {
        self.service_calls += 1;
    }
}

// ── MockDelay ─────────────────────────────────────────────────

/// Delay double: accumulates requested time instead of sleeping.
#[derive(Default)]
pub struct MockDelay {
    pub total_ns: u64,
    pub calls: u32,
}

#[allow(dead_code)]
impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
        self.calls += 1;
    }
}

// ── MockRecovery ──────────────────────────────────────────────

/// Fatal-recovery double: records restart reasons instead of rebooting.
#[derive(Default)]
pub struct MockRecovery {
    pub restarts: Vec<&'static str>,
}

#[allow(dead_code)]
impl MockRecovery {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecoveryPort for MockRecovery {
    fn restart(&mut self, reason: &'static str) {
        self.restarts.push(reason);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

/// Event sink double: keeps every emitted event for inspection.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count_matching(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
