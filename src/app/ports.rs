//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ CounterService (domain)
//! ```
//!
//! Driven adapters (sensor input, network link, publish session, storage,
//! fatal recovery) implement these traits. The
//! [`CounterService`](super::service::CounterService) consumes them via
//! generics, so the domain core never touches hardware directly.
//!
//! All port errors are typed — callers must handle every variant explicitly,
//! and every failure is consumed by its caller within the same tick.

use core::fmt;
use core::net::Ipv4Addr;

use crate::config::CounterConfig;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain samples the part-detection line through this.
pub trait SensorPort {
    /// Instantaneous logical level of the sensor line (true = part present).
    fn read_level(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Network link port (driven adapter: domain → link layer)
// ───────────────────────────────────────────────────────────────

/// The link-layer connection primitive (WiFi station on hardware).
///
/// Only the link supervisor calls these. `connect` issues an asynchronous
/// join request; the supervisor polls `is_connected` afterwards.
pub trait LinkPort {
    /// Issue a fresh connect request using the adapter-held credentials.
    fn connect(&mut self) -> Result<(), LinkError>;

    /// Tear the link down. Idempotent.
    fn disconnect(&mut self);

    /// Current link status as reported by the underlying driver. Takes
    /// `&mut self` so polling drivers can promote an in-flight join.
    fn is_connected(&mut self) -> bool;

    /// Local interface address once connected.
    fn local_address(&self) -> Option<Ipv4Addr>;
}

// ───────────────────────────────────────────────────────────────
// Publish session port (driven adapter: domain → messaging client)
// ───────────────────────────────────────────────────────────────

/// The publish-session primitive (MQTT-style client on hardware).
///
/// Endpoint, client id, keep-alive and socket timeout are fixed at adapter
/// construction from [`CounterConfig`]; the domain only drives the session
/// lifecycle and publishes payloads.
pub trait SessionPort {
    /// Attempt exactly one (bounded) connect. Never retries internally.
    fn connect(&mut self) -> Result<(), SessionError>;

    /// Current session status as reported by the client.
    fn is_connected(&mut self) -> bool;

    /// Publish a payload to `topic`. Bounded; returns within one tick.
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), SessionError>;

    /// Drive the client's internal I/O. Must be called every tick while
    /// the session is connected.
    fn service(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Fatal recovery port (driven adapter: domain → platform reset)
// ───────────────────────────────────────────────────────────────

/// Last-resort recovery: a full device restart.
///
/// On hardware this calls `esp_restart()` and never returns; test doubles
/// record the call instead, which keeps the escalation path testable.
pub trait RecoveryPort {
    fn restart(&mut self, reason: &'static str);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log, test
/// recorder, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate config values before persisting. Invalid
/// ranges are rejected with [`ConfigError::ValidationFailed`], not silently
/// clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`CounterConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<CounterConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &CounterConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`LinkPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// No credentials configured on the adapter.
    NoCredentials,
    /// The driver rejected the connect request.
    ConnectRequestFailed,
}

/// Errors from [`SessionPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// The broker refused the connection; carries the client's reason code.
    Refused(i32),
    /// No response from the broker within the socket timeout.
    Timeout,
    /// The underlying transport failed (no link, socket error).
    Transport,
    /// Operation requires a connected session.
    NotConnected,
    /// The client failed to enqueue or send the payload.
    PublishFailed,
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// Stored config failed integrity / deserialization check.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no link credentials configured"),
            Self::ConnectRequestFailed => write!(f, "link connect request failed"),
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Refused(code) => write!(f, "broker refused connection (code {})", code),
            Self::Timeout => write!(f, "session timed out"),
            Self::Transport => write!(f, "session transport failed"),
            Self::NotConnected => write!(f, "session not connected"),
            Self::PublishFailed => write!(f, "publish failed"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
