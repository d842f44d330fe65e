//! Network link supervisor.
//!
//! Verifies the link on a coarse interval and, when it is down, runs the
//! one deliberately blocking recovery path in the firmware: disconnect,
//! re-issue the connect request, and poll the driver on a fixed period
//! until the link is back or the retry budget is spent. Exhausting the
//! budget restarts the device through the injected [`RecoveryPort`] — the
//! only unrecoverable escalation in the system.
//!
//! Blocking here is an accepted tradeoff: link loss is rare, and the
//! sensor line is not time-critical during an outage of this magnitude.
//! The session supervisor is the component that must never stall the loop;
//! this one may, for at most `max_attempts × retry_poll_ms`.

use embedded_hal::delay::DelayNs;
use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, LinkPort, RecoveryPort};
use crate::config::CounterConfig;

/// Periodic link watchdog with a bounded blocking recovery path.
pub struct LinkSupervisor {
    check_interval_ms: u32,
    retry_poll_ms: u32,
    max_attempts: u32,
    last_check_ms: u32,
    /// Status observed at the last due check; returned for off-interval ticks.
    connected: bool,
}

impl LinkSupervisor {
    pub fn new(config: &CounterConfig) -> Self {
        Self {
            check_interval_ms: config.link_check_interval_ms,
            retry_poll_ms: config.link_retry_poll_ms,
            max_attempts: config.link_max_attempts,
            last_check_ms: 0,
            connected: false,
        }
    }

    /// Initial bring-up at boot: runs the same bounded recovery routine
    /// without waiting for the check interval.
    pub fn bring_up(
        &mut self,
        now_ms: u32,
        link: &mut impl LinkPort,
        delay: &mut impl DelayNs,
        recovery: &mut impl RecoveryPort,
        sink: &mut impl EventSink,
    ) -> bool {
        self.last_check_ms = now_ms;
        if link.is_connected() {
            self.connected = true;
            return true;
        }
        self.connected = self.recover(link, delay, recovery, sink);
        self.connected
    }

    /// Periodic check-and-maintain. A no-op between due intervals; when
    /// due, verifies the driver status and recovers if the link is down.
    /// Returns the current link status.
    pub fn check_and_maintain(
        &mut self,
        now_ms: u32,
        link: &mut impl LinkPort,
        delay: &mut impl DelayNs,
        recovery: &mut impl RecoveryPort,
        sink: &mut impl EventSink,
    ) -> bool {
        if now_ms.wrapping_sub(self.last_check_ms) <= self.check_interval_ms {
            return self.connected;
        }
        self.last_check_ms = now_ms;

        if link.is_connected() {
            self.connected = true;
            return true;
        }

        warn!("link: down at periodic check, starting recovery");
        sink.emit(&AppEvent::LinkLost);
        self.connected = self.recover(link, delay, recovery, sink);
        self.connected
    }

    /// Whether the link was up at the last due check.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    // ── Internal ──────────────────────────────────────────────

    /// Blocking bounded recovery: fresh connect request, then poll the
    /// driver every `retry_poll_ms` up to `max_attempts` times. Restarts
    /// the device on exhaustion.
    fn recover(
        &mut self,
        link: &mut impl LinkPort,
        delay: &mut impl DelayNs,
        recovery: &mut impl RecoveryPort,
        sink: &mut impl EventSink,
    ) -> bool {
        link.disconnect();
        if let Err(e) = link.connect() {
            warn!("link: connect request rejected — {}", e);
        }

        for attempt in 1..=self.max_attempts {
            delay.delay_ms(self.retry_poll_ms);
            if link.is_connected() {
                info!(
                    "link: restored after {} attempt(s), address {:?}",
                    attempt,
                    link.local_address()
                );
                sink.emit(&AppEvent::LinkRestored { attempts: attempt });
                return true;
            }
        }

        error!(
            "link: still down after {} attempts — restarting device",
            self.max_attempts
        );
        recovery.restart("link recovery exhausted");
        // Unreachable on hardware (restart does not return); reached by
        // test doubles that merely record the restart.
        false
    }
}
