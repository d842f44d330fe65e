//! System configuration parameters
//!
//! All tunable parameters for the piece counter. Loaded once from NVS at
//! boot (defaults otherwise) and treated as immutable by the control loop.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterConfig {
    // --- Identity ---
    /// Human-readable device name reported alongside the MAC-derived id.
    pub device_name: heapless::String<32>,
    /// Topic/channel identifier carried in every outbound report.
    pub topic: heapless::String<64>,

    // --- Network link ---
    /// WiFi SSID.
    pub wifi_ssid: heapless::String<32>,
    /// WiFi password (empty for open networks).
    pub wifi_password: heapless::String<64>,

    // --- Publish session ---
    /// Broker hostname or IP.
    pub broker_host: heapless::String<64>,
    /// Broker TCP port.
    pub broker_port: u16,
    /// Session-level keep-alive negotiated with the broker (seconds).
    pub session_keep_alive_secs: u16,
    /// Socket timeout for session I/O (seconds).
    pub session_socket_timeout_secs: u16,

    // --- Sensing ---
    /// Minimum gap between counted pieces (milliseconds).
    pub debounce_ms: u32,

    // --- Resilience ---
    /// How often the network link status is verified (milliseconds).
    pub link_check_interval_ms: u32,
    /// Poll period inside the blocking link-recovery loop (milliseconds).
    pub link_retry_poll_ms: u32,
    /// Link-recovery polls before the device restarts.
    pub link_max_attempts: u32,
    /// Minimum gap between session reconnect attempts (milliseconds).
    pub session_retry_interval_ms: u32,

    // --- Reporting ---
    /// Liveness report period (milliseconds).
    pub keepalive_interval_ms: u32,

    // --- Timing ---
    /// Control loop tick delay (milliseconds).
    pub tick_interval_ms: u32,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            // Identity
            device_name: heapless::String::try_from("counter-01").unwrap_or_default(),
            topic: heapless::String::try_from("factory/counter/line1").unwrap_or_default(),

            // Network link
            wifi_ssid: heapless::String::try_from("factory-net").unwrap_or_default(),
            wifi_password: heapless::String::new(),

            // Publish session
            broker_host: heapless::String::try_from("192.168.1.100").unwrap_or_default(),
            broker_port: 1883,
            session_keep_alive_secs: 60,
            session_socket_timeout_secs: 5,

            // Sensing
            debounce_ms: 200,

            // Resilience
            link_check_interval_ms: 30_000,
            link_retry_poll_ms: 500,
            link_max_attempts: 20,
            session_retry_interval_ms: 5_000,

            // Reporting
            keepalive_interval_ms: 60_000,

            // Timing
            tick_interval_ms: 10,
        }
    }
}
