//! Publish-session supervisor.
//!
//! Keeps the broker session alive without ever stalling the control loop:
//! a connected session costs one status query per tick, a dead one costs
//! at most a single bounded connect attempt per retry interval. Session
//! loss is always treated as transient — this component never restarts
//! the device.
//!
//! ```text
//! DISCONNECTED --(retry interval elapsed)--> CONNECTING --(success)--> CONNECTED
//! CONNECTING --(failure)--> DISCONNECTED
//! CONNECTED --(client reports drop)--> DISCONNECTED
//! ```
//!
//! CONNECTING is instantaneous (one attempt within a single call), so only
//! the two durable phases are stored.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, SessionPort};
use crate::config::CounterConfig;

/// Durable phases of the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Disconnected,
    Connected,
}

/// Outcome of one [`SessionSupervisor::ensure_connected`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPoll {
    /// Session was already connected; nothing to do.
    Connected,
    /// This call connected the session — the caller announces liveness.
    CameOnline,
    /// Disconnected, and the retry interval has not elapsed; no attempt made.
    Waiting,
    /// One connect attempt was made and failed.
    AttemptFailed,
}

impl SessionPoll {
    /// Whether the session is usable after this poll.
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected | Self::CameOnline)
    }
}

/// Rate-limited, non-blocking session watchdog.
pub struct SessionSupervisor {
    retry_interval_ms: u32,
    phase: Phase,
    /// `None` until the first attempt, so boot connects without waiting
    /// out a full retry interval.
    last_attempt_ms: Option<u32>,
}

impl SessionSupervisor {
    pub fn new(config: &CounterConfig) -> Self {
        Self {
            retry_interval_ms: config.session_retry_interval_ms,
            phase: Phase::Disconnected,
            last_attempt_ms: None,
        }
    }

    /// Verify the session and, when due, attempt exactly one reconnect.
    ///
    /// Returns within one call in every state; the only external calls are
    /// one status query and at most one bounded connect.
    pub fn ensure_connected(
        &mut self,
        now_ms: u32,
        session: &mut impl SessionPort,
        sink: &mut impl EventSink,
    ) -> SessionPoll {
        if session.is_connected() {
            self.phase = Phase::Connected;
            return SessionPoll::Connected;
        }

        if self.phase == Phase::Connected {
            warn!("session: client reports drop");
            sink.emit(&AppEvent::SessionLost);
            self.phase = Phase::Disconnected;
        }

        if let Some(last) = self.last_attempt_ms {
            if now_ms.wrapping_sub(last) <= self.retry_interval_ms {
                return SessionPoll::Waiting;
            }
        }

        self.last_attempt_ms = Some(now_ms);
        match session.connect() {
            Ok(()) => {
                info!("session: connected");
                self.phase = Phase::Connected;
                SessionPoll::CameOnline
            }
            Err(e) => {
                warn!("session: connect failed — {}", e);
                sink.emit(&AppEvent::SessionRetryFailed { error: e });
                SessionPoll::AttemptFailed
            }
        }
    }

    /// Whether the supervisor last observed the session connected.
    pub fn is_connected(&self) -> bool {
        self.phase == Phase::Connected
    }
}
