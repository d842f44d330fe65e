//! Outbound application events.
//!
//! The [`CounterService`](super::service::CounterService) emits these through
//! the [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them — log to serial, record in a test
//! harness, etc. These are observability events; the wire reports the
//! broker sees are built separately by the [`Reporter`](crate::report::Reporter).

use super::ports::SessionError;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The control loop has started (carries the running counter, which is
    /// non-zero only after a warm start).
    Started { count: u32 },

    /// A debounced rising edge was counted.
    PieceDetected { count: u32, timestamp_ms: u32 },

    /// A piece was counted while the session was down; the report was
    /// dropped (counting continues, only the report is lost).
    ReportDropped { count: u32 },

    /// The periodic link check found the link down.
    LinkLost,

    /// The link came back after `attempts` recovery polls.
    LinkRestored { attempts: u32 },

    /// The publish session dropped.
    SessionLost,

    /// The publish session (re)connected; the online announcement carrying
    /// `count` was published.
    SessionOnline { count: u32 },

    /// A rate-limited session reconnect attempt failed.
    SessionRetryFailed { error: SessionError },

    /// A liveness report was published.
    KeepaliveSent { count: u32, uptime_secs: u32 },
}
