//! Hardware adapter — bridges the part-detection input to [`SensorPort`].
//!
//! The sensor line is read through `embedded_hal::digital::InputPin`, so
//! the same adapter serves the real GPIO pin driver on ESP32 and any
//! simulated or mocked pin on the host. This is the only module in the
//! system that touches the sensor hardware.

use embedded_hal::digital::InputPin;

use crate::app::ports::SensorPort;

/// Concrete adapter wrapping the part-detection GPIO behind [`SensorPort`].
pub struct GpioPulseSensor<P> {
    pin: P,
}

impl<P: InputPin> GpioPulseSensor<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: InputPin> SensorPort for GpioPulseSensor<P> {
    fn read_level(&mut self) -> bool {
        // GPIO reads on this platform are infallible; a failing mock pin
        // reads as "no part present".
        self.pin.is_high().unwrap_or(false)
    }
}

// ───────────────────────────────────────────────────────────────
// Simulated pulse source (host targets)
// ───────────────────────────────────────────────────────────────

/// Deterministic pulse generator for the host binary: high for
/// `high_samples` out of every `period_samples` reads.
#[cfg(not(target_os = "espidf"))]
pub struct SimPulsePin {
    period_samples: u32,
    high_samples: u32,
    pos: u32,
}

#[cfg(not(target_os = "espidf"))]
impl SimPulsePin {
    pub fn new(period_samples: u32, high_samples: u32) -> Self {
        Self {
            period_samples: period_samples.max(1),
            high_samples,
            pos: 0,
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl embedded_hal::digital::ErrorType for SimPulsePin {
    type Error = core::convert::Infallible;
}

#[cfg(not(target_os = "espidf"))]
impl InputPin for SimPulsePin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let high = self.pos < self.high_samples;
        self.pos = (self.pos + 1) % self.period_samples;
        Ok(high)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|h| !h)
    }
}
