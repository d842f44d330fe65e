//! Concrete adapters behind the port traits.
//!
//! Everything that touches a platform API lives here, cfg-gated per
//! target: real ESP-IDF calls under `target_os = "espidf"`, simulation
//! backends everywhere else so the whole system runs on the host.

pub mod device_id;
pub mod hardware;
pub mod log_sink;
pub mod mqtt;
pub mod nvs;
pub mod restart;
pub mod time;
pub mod wifi;
