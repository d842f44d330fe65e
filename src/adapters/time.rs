//! ESP32 time adapter.
//!
//! Provides monotonic time queries and blocking delays for the counter.
//!
//! - **`target_os = "espidf"`** — wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic) and
//!   the FreeRTOS-aware `esp_idf_hal` delay.
//! - **`not(target_os = "espidf")`** — uses `std::time::Instant` and
//!   `std::thread::sleep` for host-side testing and simulation.
//!
//! Millisecond timestamps are truncated to `u32` and wrap after ~49.7
//! days; every consumer compares them with wrapping subtraction.

use embedded_hal::delay::DelayNs;

/// Time adapter for the ESP32 platform.
pub struct Esp32TimeAdapter {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
    #[cfg(target_os = "espidf")]
    delay: esp_idf_hal::delay::Delay,
}

impl Default for Esp32TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
            #[cfg(target_os = "espidf")]
            delay: esp_idf_hal::delay::Delay::new_default(),
        }
    }

    /// Milliseconds since boot (monotonic, wraps at `u32::MAX`).
    #[cfg(target_os = "espidf")]
    pub fn uptime_ms(&self) -> u32 {
        ((unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1_000) as u32
    }

    /// Milliseconds since boot (monotonic, wraps at `u32::MAX`).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }

    /// Seconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn uptime_secs(&self) -> u32 {
        ((unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1_000_000) as u32
    }

    /// Seconds since boot (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_secs(&self) -> u32 {
        self.start.elapsed().as_secs() as u32
    }
}

impl DelayNs for Esp32TimeAdapter {
    #[cfg(target_os = "espidf")]
    fn delay_ns(&mut self, ns: u32) {
        self.delay.delay_ns(ns);
    }

    #[cfg(not(target_os = "espidf"))]
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }
}
