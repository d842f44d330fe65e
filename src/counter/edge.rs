//! Debounced rising-edge detector for the part-detection line.
//!
//! The optical gate on the line bounces for tens of milliseconds around
//! each part, so a raw rising edge is only counted when it arrives more
//! than `debounce_ms` after the previously counted edge. Timestamps are
//! `u32` milliseconds since boot; all comparisons use wrapping subtraction
//! so the detector survives the counter's wrap (~49.7 days) without a
//! spurious or missed count.

/// A single counted part detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceEvent {
    /// Monotonic timestamp of the counted edge (milliseconds since boot).
    pub timestamp_ms: u32,
}

/// Debounced logical state of the sensor line.
pub struct EdgeDetector {
    debounce_ms: u32,
    previous_level: bool,
    /// Timestamp of the last counted edge. `None` until the first count,
    /// so the first edge after boot is never suppressed.
    last_event_ms: Option<u32>,
}

impl EdgeDetector {
    pub fn new(debounce_ms: u32) -> Self {
        Self {
            debounce_ms,
            previous_level: false,
            last_event_ms: None,
        }
    }

    /// Sample the line once. Call every control tick.
    ///
    /// `now_ms` must be monotonically non-decreasing per tick (modulo wrap).
    /// Returns a [`PieceEvent`] only on a rising edge that falls outside the
    /// debounce window; the remembered level is updated on every sample,
    /// whether or not an event fired. Falling edges and in-window edges
    /// have no side effect beyond that.
    pub fn sample(&mut self, raw_level: bool, now_ms: u32) -> Option<PieceEvent> {
        let rising = raw_level && !self.previous_level;
        self.previous_level = raw_level;

        if !rising {
            return None;
        }

        let outside_window = match self.last_event_ms {
            Some(last) => now_ms.wrapping_sub(last) > self.debounce_ms,
            None => true,
        };
        if !outside_window {
            return None;
        }

        self.last_event_ms = Some(now_ms);
        Some(PieceEvent { timestamp_ms: now_ms })
    }

    /// Timestamp of the last counted edge, if any.
    pub fn last_event_ms(&self) -> Option<u32> {
        self.last_event_ms
    }
}
