//! Device identity
//!
//! A random UUID generated on first launch and kept in storage. It is the
//! join key for the player's name and scores, not an account.

use rand::Rng;

use super::protocol::{MAX_NAME_LEN, RegisterRequest};
use crate::platform::storage;

pub const DEVICE_ID_KEY: &str = "deviceId";
pub const NAME_KEY: &str = "playerName";
pub const DEFAULT_NAME: &str = "Guest";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub device_id: String,
    pub name: String,
}

/// Random version 4 UUID in the usual hyphenated form
pub fn new_device_id<R: Rng>(rng: &mut R) -> String {
    let mut bytes: [u8; 16] = rng.random();
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

/// First 16 characters, trimmed; blank or missing becomes the default name
pub fn sanitize_name(raw: Option<&str>) -> String {
    let cut: String = raw.unwrap_or_default().chars().take(MAX_NAME_LEN).collect();
    let trimmed = cut.trim();
    if trimmed.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

impl Identity {
    /// Stored identity, creating and saving whatever is missing.
    /// `ask_name` is only called when no name has been stored yet.
    pub fn load_or_create(ask_name: impl FnOnce() -> Option<String>) -> Self {
        let device_id = match storage::get(DEVICE_ID_KEY).filter(|id| !id.trim().is_empty()) {
            Some(id) => id,
            None => {
                let id = new_device_id(&mut rand::rng());
                storage::set(DEVICE_ID_KEY, &id);
                log::info!("Generated device id {id}");
                id
            }
        };

        let name = match storage::get(NAME_KEY).filter(|n| !n.trim().is_empty()) {
            Some(name) => name,
            None => {
                let name = sanitize_name(ask_name().as_deref());
                storage::set(NAME_KEY, &name);
                name
            }
        };

        Self { device_id, name }
    }

    pub fn register_request(&self) -> RegisterRequest {
        RegisterRequest {
            device_id: self.device_id.clone(),
            name: self.name.clone(),
        }
    }
}
