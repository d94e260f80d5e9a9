//! Bridge configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tether_core::Result;

/// Settings applied when a [`Bridge`](crate::Bridge) is built.
///
/// Every field has a default, so partial JSON is accepted:
///
/// ```rust
/// use tether::BridgeConfig;
///
/// let config = BridgeConfig::from_json(r#"{"default_timeout_ms": 2500}"#).unwrap();
/// assert_eq!(config.default_timeout().as_millis(), 2500);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Reply window for RPC calls that don't set their own, in milliseconds.
    pub default_timeout_ms: u64,
}

impl BridgeConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// The default RPC timeout as a `Duration`.
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: 10_000,
        }
    }
}
