//! Fatal recovery adapter.
//!
//! Implements [`RecoveryPort`] with a full chip reset. This is the only
//! escalation in the firmware that loses in-memory state, including the
//! running tally — the accepted data-loss boundary for an unrecoverable
//! link outage.

use log::error;

use crate::app::ports::RecoveryPort;

/// Restarts the device (chip reset on hardware, process exit on the host).
pub struct EspRestart;

impl EspRestart {
    pub fn new() -> Self {
        Self
    }
}

impl RecoveryPort for EspRestart {
    #[cfg(target_os = "espidf")]
    fn restart(&mut self, reason: &'static str) {
        error!("RESTART | {}", reason);
        // SAFETY: esp_restart never returns; all peripherals are reset by
        // the ROM bootloader on the way back up.
        unsafe {
            esp_idf_svc::sys::esp_restart();
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn restart(&mut self, reason: &'static str) {
        error!("RESTART | {}", reason);
        // The host simulation mirrors a chip reset by exiting; a process
        // supervisor (or the operator) starts it again.
        std::process::exit(1);
    }
}
