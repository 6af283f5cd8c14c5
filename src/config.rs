//! Gateway profile configuration.
//!
//! Profiles are read from JSON:
//!
//! ```json
//! {
//!   "gateways": {
//!     "real": {
//!       "base_url": "https://sandbox.payture.com/apim",
//!       "merchant_key": "Merchant",
//!       "timeout_secs": 30
//!     }
//!   }
//! }
//! ```

use crate::error::{PaymentError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Connection settings for one wire gateway client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayProfile {
    /// Endpoint prefix; operation names are appended as path segments.
    pub base_url: String,
    /// Merchant identifier sent as `Key` on every request.
    pub merchant_key: String,
    /// Request timeout. No timeout when absent.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl GatewayProfile {
    pub fn new(base_url: impl Into<String>, merchant_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            merchant_key: merchant_key.into(),
            timeout_secs: None,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<()> {
        reqwest::Url::parse(&self.base_url).map_err(|e| {
            PaymentError::ConfigError(format!("invalid base_url '{}': {e}", self.base_url))
        })?;
        if self.merchant_key.trim().is_empty() {
            return Err(PaymentError::ConfigError(
                "merchant_key must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewaysConfig {
    #[serde(default)]
    pub gateways: HashMap<String, GatewayProfile>,
}

impl GatewaysConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        for profile in config.gateways.values() {
            profile.validate()?;
        }
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
