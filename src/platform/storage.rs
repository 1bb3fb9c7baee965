//! Key/value storage
//!
//! LocalStorage on the web. Native builds have nowhere to persist to, so
//! reads come back empty and writes are dropped.

use serde::Serialize;
use serde::de::DeserializeOwned;

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
}

/// Read a raw string value
#[cfg(target_arch = "wasm32")]
pub fn get(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok().flatten()
}

/// Write a raw string value. Returns false if storage is unavailable or full.
#[cfg(target_arch = "wasm32")]
pub fn set(key: &str, value: &str) -> bool {
    match local_storage() {
        Some(storage) => storage.set_item(key, value).is_ok(),
        None => false,
    }
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn get(_key: &str) -> Option<String> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn set(_key: &str, _value: &str) -> bool {
    false
}

/// Read and deserialize a JSON value. Corrupt entries are logged and ignored.
pub fn load_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    let json = get(key)?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring unreadable {key}: {e}");
            None
        }
    }
}

/// Serialize and store a JSON value
pub fn save_json<T: Serialize>(key: &str, value: &T) -> bool {
    match serde_json::to_string(value) {
        Ok(json) => set(key, &json),
        Err(e) => {
            log::warn!("Failed to serialize {key}: {e}");
            false
        }
    }
}
