//! Device identity derived from the ESP32 factory MAC address.
//!
//! Produces a stable, human-readable device ID in the form `PC-XXYYZZ`
//! (last 3 bytes of the 6-byte MAC in uppercase hex). This ID is:
//! - Deterministic across reboots (factory-burned eFuse MAC)
//! - Used (lowercased, as `counter-xxyyzz`) as the broker client id

/// Fixed-size device ID string: "PC-XXYYZZ" (9 chars + null = 10 max).
pub type DeviceIdString = heapless::String<16>;

/// Full 6-byte MAC address.
pub type MacAddress = [u8; 6];

/// Read the factory MAC address from eFuse.
#[cfg(target_os = "espidf")]
pub fn read_mac() -> MacAddress {
    let mut mac: MacAddress = [0u8; 6];
    unsafe {
        esp_idf_svc::sys::esp_efuse_mac_get_default(mac.as_mut_ptr());
    }
    mac
}

/// Simulation: returns a deterministic fake MAC.
#[cfg(not(target_os = "espidf"))]
pub fn read_mac() -> MacAddress {
    [0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]
}

/// Derive the short device ID from the last 3 MAC bytes.
/// Format: `PC-XXYYZZ` (e.g., `PC-EFCAFE`).
pub fn device_id(mac: &MacAddress) -> DeviceIdString {
    let mut id = DeviceIdString::new();
    use core::fmt::Write;
    let _ = write!(id, "PC-{:02X}{:02X}{:02X}", mac[3], mac[4], mac[5]);
    id
}

/// Derive the broker client id from the last 3 MAC bytes.
/// Format: `counter-xxyyzz` (lowercase).
pub fn client_id(mac: &MacAddress) -> heapless::String<24> {
    let mut name = heapless::String::<24>::new();
    use core::fmt::Write;
    let _ = write!(name, "counter-{:02x}{:02x}{:02x}", mac[3], mac[4], mac[5]);
    name
}
