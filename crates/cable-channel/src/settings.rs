// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Gateway preferences and the config storage port.
//!
//! Prefs are loaded once at process start and never mutated afterward; the
//! wire coder is validated at load so a misconfigured process refuses to
//! boot instead of silently re-encoding broadcasts the gateway cannot read.

use cable_proto::{Coder, CompatibilityError};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// Storage port for raw config blobs (keyed by logical name).
pub trait ConfigStore {
    /// Loads a raw config blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Persists a raw config blob.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key not present in store.
    #[error("not found")]
    NotFound,
    /// I/O error while reading/writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization/deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Thin service that serializes config values and delegates storage to a
/// [`ConfigStore`].
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Creates a service using the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S> ConfigService<S>
where
    S: ConfigStore,
{
    /// Loads and deserializes a config value for `key`. `Ok(None)` when
    /// missing or empty.
    pub fn load<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: DeserializeOwned,
    {
        match self.store.load_raw(key) {
            Ok(bytes) => {
                if bytes.is_empty() {
                    return Ok(None);
                }
                let value = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            Err(ConfigError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Serializes and persists a config value for `key`.
    pub fn save<T>(&self, key: &str, value: &T) -> Result<(), ConfigError>
    where
        T: Serialize,
    {
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)
    }
}

/// Gateway connection preferences, established once at process start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GatewayPrefs {
    /// RPC endpoint of the gateway (host:port).
    pub rpc_endpoint: String,
    /// Wire coder the gateway decodes. Anything but the default fails
    /// [`GatewayPrefs::validate`].
    pub coder: Coder,
}

impl Default for GatewayPrefs {
    fn default() -> Self {
        Self {
            rpc_endpoint: "127.0.0.1:50051".into(),
            coder: Coder::DEFAULT,
        }
    }
}

impl GatewayPrefs {
    /// Logical key under which prefs are stored.
    pub const CONFIG_KEY: &'static str = "gateway";

    /// Loads prefs from the config service, falling back to defaults when
    /// the blob is missing.
    ///
    /// # Errors
    /// Propagates [`ConfigError`] for unreadable or malformed blobs.
    pub fn load<S: ConfigStore>(service: &ConfigService<S>) -> Result<Self, ConfigError> {
        Ok(service.load(Self::CONFIG_KEY)?.unwrap_or_default())
    }

    /// Rejects a configured coder the gateway cannot decode.
    ///
    /// # Errors
    /// Returns [`CompatibilityError::UnsupportedCoder`] for any non-default
    /// coder.
    pub fn validate(&self) -> Result<(), CompatibilityError> {
        if self.coder.is_default() {
            Ok(())
        } else {
            Err(CompatibilityError::UnsupportedCoder)
        }
    }
}
