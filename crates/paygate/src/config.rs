//! Gateway configuration, loaded from TOML.
//!
//! ```toml
//! [http]
//! connect_timeout_secs = 10
//! request_timeout_secs = 30
//!
//! [momo]
//! partner_code = "MOMO"
//! access_key = "F8BBA842ECF85"
//! secret_key = "..."
//! return_url = "https://shop.example/momo-return"
//! notify_url = "https://api.example/api/payments/momo/notify"
//!
//! [vnpay]
//! tmn_code = "DEMO0001"
//! secret_key = "..."
//! return_url = "https://shop.example/vnpay-return"
//! ```

use std::path::Path;
use std::time::Duration;

use paygate_momo::MomoConfig;
use paygate_vnpay::VnpayConfig;
use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, Result};

/// Outbound HTTP limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    /// Bound on the whole request, connect included.
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Configuration for every processor the gateway talks to.
///
/// A processor whose section is absent is simply not offered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub momo: Option<MomoConfig>,
    pub vnpay: Option<VnpayConfig>,
    pub http: HttpConfig,
}

impl GatewayConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // Only the message: the rendered error quotes the offending line, which may hold a secret
        toml::from_str(content).map_err(|e: toml::de::Error| {
            GatewayError::Configuration(format!("invalid configuration: {}", e.message()))
        })
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GatewayError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Save configuration to a TOML file.
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| GatewayError::Configuration(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| {
            GatewayError::Configuration(format!("cannot write {}: {}", path.display(), e))
        })
    }

    /// Check every configured processor, plus the HTTP limits.
    pub fn validate(&self) -> Result<()> {
        if let Some(momo) = &self.momo {
            momo.validate()?;
        }
        if let Some(vnpay) = &self.vnpay {
            vnpay.validate()?;
        }
        if self.http.connect_timeout_secs == 0 || self.http.request_timeout_secs == 0 {
            return Err(GatewayError::Configuration(
                "http timeouts must be positive".into(),
            ));
        }
        Ok(())
    }
}
