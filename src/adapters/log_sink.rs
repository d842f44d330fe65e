//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC in production). These lines are pure
//! observability — nothing parses them.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { count } => {
                info!("START | counter={}", count);
            }
            AppEvent::PieceDetected { count, timestamp_ms } => {
                info!("PIECE | #{} at t={}ms", count, timestamp_ms);
            }
            AppEvent::ReportDropped { count } => {
                warn!("DROP  | piece #{} unreported (session down)", count);
            }
            AppEvent::LinkLost => {
                warn!("LINK  | down, recovering");
            }
            AppEvent::LinkRestored { attempts } => {
                info!("LINK  | restored after {} attempt(s)", attempts);
            }
            AppEvent::SessionLost => {
                warn!("SESS  | dropped");
            }
            AppEvent::SessionOnline { count } => {
                info!("SESS  | online, counter={}", count);
            }
            AppEvent::SessionRetryFailed { error } => {
                warn!("SESS  | retry failed: {}", error);
            }
            AppEvent::KeepaliveSent { count, uptime_secs } => {
                info!("ALIVE | counter={} uptime={}s", count, uptime_secs);
            }
        }
    }
}
