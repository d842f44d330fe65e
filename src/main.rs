//! PieceCounter Firmware — Main Entry Point
//!
//! Hexagonal architecture, single cooperative control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  GpioPulseSensor   WifiAdapter    MqttSession    NvsAdapter    │
//! │  (SensorPort)      (LinkPort)     (SessionPort)  (ConfigPort)  │
//! │  Esp32TimeAdapter  LogEventSink   EspRestart                   │
//! │  (clock+delay)     (EventSink)    (RecoveryPort)               │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │             CounterService (pure logic)                │    │
//! │  │  edge detector · tally · supervisors · reporter        │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each loop tick runs link maintenance, session maintenance, the
//! session's internal service step, the keepalive check, and finally the
//! sensor sample — then yields for `tick_interval_ms`.
#![deny(unused_must_use)]

use anyhow::Result;
use embedded_hal::delay::DelayNs;
use log::{info, warn};

use piececounter::adapters::device_id;
use piececounter::adapters::log_sink::LogEventSink;
use piececounter::adapters::mqtt::MqttSession;
use piececounter::adapters::nvs::NvsAdapter;
use piececounter::adapters::restart::EspRestart;
use piececounter::adapters::time::Esp32TimeAdapter;
use piececounter::adapters::wifi::WifiAdapter;
use piececounter::app::ports::{ConfigPort, SensorPort};
use piececounter::app::service::CounterService;
use piececounter::config::CounterConfig;

fn main() -> Result<()> {
    // ── 1. Platform bootstrap ─────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }
    #[cfg(not(target_os = "espidf"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("╔══════════════════════════════════════╗");
    info!("║  PieceCounter v{}                 ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let nvs = match NvsAdapter::new() {
        Ok(n) => n,
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults and no persistence", e);
            // Continue without NVS — config changes will not persist this
            // session. On next reboot, NVS should self-heal.
            NvsAdapter::default()
        }
    };
    let config = match nvs.load() {
        Ok(cfg) => {
            info!("Config loaded from NVS");
            cfg
        }
        Err(e) => {
            warn!("NVS config load failed ({}), using defaults", e);
            CounterConfig::default()
        }
    };

    // ── 3. Device identity ────────────────────────────────────
    let mac = device_id::read_mac();
    let dev_id = device_id::device_id(&mac);
    let client_id = device_id::client_id(&mac);
    info!(
        "Device ID: {} ('{}', client '{}')",
        dev_id, config.device_name, client_id
    );

    // ── 4. Construct adapters ─────────────────────────────────
    let mut time = Esp32TimeAdapter::new();
    let mut sink = LogEventSink::new();
    let mut recovery = EspRestart::new();

    let mut wifi = WifiAdapter::new();
    if let Err(e) = wifi.set_credentials(&config.wifi_ssid, &config.wifi_password) {
        warn!("WiFi credentials invalid ({}), link will not come up", e);
    }

    let mut session = MqttSession::new(&config, &client_id);
    let (host, port) = session.endpoint();
    info!("Broker endpoint: {}:{} topic '{}'", host, port, config.topic);

    // Part-detection input: GPIO21 on hardware, a deterministic pulse
    // generator on the host (one piece roughly every 2 s at a 10 ms tick).
    #[cfg(target_os = "espidf")]
    let mut sensor = {
        let peripherals = esp_idf_hal::peripherals::Peripherals::take()?;
        piececounter::adapters::hardware::GpioPulseSensor::new(
            esp_idf_hal::gpio::PinDriver::input(peripherals.pins.gpio21)?,
        )
    };
    #[cfg(not(target_os = "espidf"))]
    let mut sensor = piececounter::adapters::hardware::GpioPulseSensor::new(
        piececounter::adapters::hardware::SimPulsePin::new(200, 3),
    );

    // ── 5. Construct the service and bring the network up ─────
    let mut service = CounterService::new(&config);
    let boot_ms = time.uptime_ms();
    service.start(
        boot_ms,
        &mut wifi,
        &mut session,
        &mut time,
        &mut recovery,
        &mut sink,
    );

    info!("System ready. Entering control loop.");

    // ── 6. Control loop ───────────────────────────────────────
    loop {
        let now_ms = time.uptime_ms();
        let level = sensor.read_level();
        service.tick(
            now_ms,
            level,
            &mut wifi,
            &mut session,
            &mut time,
            &mut recovery,
            &mut sink,
        );

        // Yield to the platform between ticks.
        time.delay_ms(config.tick_interval_ms);
    }
}
