//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`ConfigPort`]: the counter configuration is persisted as a
//! single `postcard` blob. All fields are range-checked before persistence
//! so a bad provisioning tool cannot park the device with, say, a zero
//! debounce window. Writes are atomic per `nvs_commit()`.

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::CounterConfig;
use log::info;
#[cfg(target_os = "espidf")]
use log::warn;

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

const CONFIG_NAMESPACE: &str = "counter";
const CONFIG_KEY: &str = "cfg";

#[allow(dead_code)]
const MAX_BLOB_SIZE: usize = 2000;

pub struct NvsAdapter {
    #[cfg(not(target_os = "espidf"))]
    store: std::cell::RefCell<HashMap<String, Vec<u8>>>,
}

impl NvsAdapter {
    /// Create a new NvsAdapter and initialise NVS flash.
    ///
    /// Returns `Err(ConfigError::IoError)` if flash initialisation fails
    /// unrecoverably. On first boot or after a version mismatch the NVS
    /// partition is erased and re-initialised automatically.
    pub fn new() -> Result<Self, ConfigError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase are called from the
            // single main-task context before any concurrent NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                warn!("NVS: erasing and re-initialising flash partition");
                let ret2 = unsafe { nvs_flash_erase() };
                if ret2 != ESP_OK {
                    return Err(ConfigError::IoError);
                }
                let ret3 = unsafe { nvs_flash_init() };
                if ret3 != ESP_OK {
                    return Err(ConfigError::IoError);
                }
            } else if ret != ESP_OK {
                return Err(ConfigError::IoError);
            }
            info!("NvsAdapter: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsAdapter: simulation backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            store: std::cell::RefCell::new(HashMap::new()),
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{}::{}", namespace, key)
    }

    /// Open an NVS namespace, execute a closure with the handle, then close.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(namespace: &str, write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let mut ns_buf = [0u8; 16];
        let ns_bytes = namespace.as_bytes();
        let len = ns_bytes.len().min(15);
        ns_buf[..len].copy_from_slice(&ns_bytes[..len]);

        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        let ret = unsafe { nvs_open(ns_buf.as_ptr() as *const _, mode, &mut handle) };
        if ret != ESP_OK {
            return Err(ret);
        }

        let result = f(handle);
        unsafe {
            nvs_close(handle);
        }
        result
    }
}

fn validate_config(cfg: &CounterConfig) -> Result<(), ConfigError> {
    if cfg.topic.is_empty() {
        return Err(ConfigError::ValidationFailed("topic must not be empty"));
    }
    if cfg.broker_port == 0 {
        return Err(ConfigError::ValidationFailed("broker_port must be non-zero"));
    }
    if !(10..=10_000).contains(&cfg.debounce_ms) {
        return Err(ConfigError::ValidationFailed("debounce_ms must be 10–10000"));
    }
    if !(1_000..=600_000).contains(&cfg.link_check_interval_ms) {
        return Err(ConfigError::ValidationFailed(
            "link_check_interval_ms must be 1000–600000",
        ));
    }
    if !(100..=5_000).contains(&cfg.link_retry_poll_ms) {
        return Err(ConfigError::ValidationFailed(
            "link_retry_poll_ms must be 100–5000",
        ));
    }
    if !(1..=100).contains(&cfg.link_max_attempts) {
        return Err(ConfigError::ValidationFailed(
            "link_max_attempts must be 1–100",
        ));
    }
    if !(500..=60_000).contains(&cfg.session_retry_interval_ms) {
        return Err(ConfigError::ValidationFailed(
            "session_retry_interval_ms must be 500–60000",
        ));
    }
    if !(5_000..=3_600_000).contains(&cfg.keepalive_interval_ms) {
        return Err(ConfigError::ValidationFailed(
            "keepalive_interval_ms must be 5000–3600000",
        ));
    }
    if !(1..=1_000).contains(&cfg.tick_interval_ms) {
        return Err(ConfigError::ValidationFailed("tick_interval_ms must be 1–1000"));
    }
    if cfg.tick_interval_ms >= cfg.debounce_ms {
        return Err(ConfigError::ValidationFailed(
            "tick_interval_ms must be below debounce_ms",
        ));
    }
    Ok(())
}

impl ConfigPort for NvsAdapter {
    fn load(&self) -> Result<CounterConfig, ConfigError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let key = Self::composite_key(CONFIG_NAMESPACE, CONFIG_KEY);
            if let Some(bytes) = self.store.borrow().get(&key) {
                let cfg: CounterConfig =
                    postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted)?;
                info!("NvsAdapter: loaded config from store");
                Ok(cfg)
            } else {
                info!("NvsAdapter: no stored config, using defaults");
                Ok(CounterConfig::default())
            }
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(CONFIG_NAMESPACE, false, |handle| {
                let key_cstr = b"cfg\0";
                let mut size: usize = 0;

                // First call: get size
                let ret = unsafe {
                    nvs_get_blob(
                        handle,
                        key_cstr.as_ptr() as *const _,
                        core::ptr::null_mut(),
                        &mut size,
                    )
                };
                if ret == ESP_ERR_NVS_NOT_FOUND {
                    return Err(ESP_ERR_NVS_NOT_FOUND);
                }
                if ret != ESP_OK || size == 0 || size > MAX_BLOB_SIZE {
                    return Err(ret);
                }

                let mut buf = vec![0u8; size];
                let ret = unsafe {
                    nvs_get_blob(
                        handle,
                        key_cstr.as_ptr() as *const _,
                        buf.as_mut_ptr() as *mut _,
                        &mut size,
                    )
                };
                if ret != ESP_OK {
                    return Err(ret);
                }

                Ok(buf)
            });

            match result {
                Ok(bytes) => {
                    let cfg: CounterConfig =
                        postcard::from_bytes(&bytes).map_err(|_| ConfigError::Corrupted)?;
                    info!("NvsAdapter: loaded config from NVS ({} bytes)", bytes.len());
                    Ok(cfg)
                }
                Err(e) if e == ESP_ERR_NVS_NOT_FOUND => {
                    info!("NvsAdapter: no stored config, using defaults");
                    Ok(CounterConfig::default())
                }
                Err(e) => {
                    warn!("NvsAdapter: NVS read error {}, using defaults", e);
                    Ok(CounterConfig::default())
                }
            }
        }
    }

    fn save(&self, config: &CounterConfig) -> Result<(), ConfigError> {
        validate_config(config)?;

        #[cfg(not(target_os = "espidf"))]
        {
            let key = Self::composite_key(CONFIG_NAMESPACE, CONFIG_KEY);
            let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
            self.store.borrow_mut().insert(key, bytes);
            info!("NvsAdapter: config saved (simulation)");
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
            let result = Self::with_nvs_handle(CONFIG_NAMESPACE, true, |handle| {
                let key_cstr = b"cfg\0";
                let ret = unsafe {
                    nvs_set_blob(
                        handle,
                        key_cstr.as_ptr() as *const _,
                        bytes.as_ptr() as *const _,
                        bytes.len(),
                    )
                };
                if ret != ESP_OK {
                    return Err(ret);
                }
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(())
            });
            match result {
                Ok(()) => {
                    info!("NvsAdapter: config saved to NVS ({} bytes)", bytes.len());
                    Ok(())
                }
                Err(e) => {
                    warn!("NvsAdapter: NVS write error {}", e);
                    Err(ConfigError::IoError)
                }
            }
        }
    }
}

impl Default for NvsAdapter {
    fn default() -> Self {
        // Last-resort fallback when flash init fails: volatile backend,
        // config will not be persisted this session.
        Self::new().unwrap_or(Self {
            #[cfg(not(target_os = "espidf"))]
            store: std::cell::RefCell::new(HashMap::new()),
        })
    }
}
