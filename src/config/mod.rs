//! Proxy configuration loaded from YAML

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::FluxError;
use crate::image::{ParseOptions, DEFAULT_RATIO_SCALE};
use crate::proxy::Proxy;

/// Settings for one proxy host, loaded from YAML
///
/// ```yaml
/// host: demo.imageflux.jp
/// secret: ${IMAGEFLUX_SECRET}
/// strict_keys: false
/// ratio_scale: 65536
/// ```
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProxyConfig {
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    /// Reject unknown parameter keys instead of ignoring them
    #[serde(default)]
    pub strict_keys: bool,
    /// Denominator for ratio clips and offsets (100 for the earlier protocol)
    #[serde(default = "default_ratio_scale")]
    pub ratio_scale: u32,
}

fn default_ratio_scale() -> u32 {
    DEFAULT_RATIO_SCALE as u32
}

impl ProxyConfig {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, FluxError> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| FluxError::config(e.to_string()))?;

        // First, check that all referenced environment variables exist
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            std::env::var(var_name).map_err(|_| {
                FluxError::config(format!(
                    "Environment variable '{}' is referenced but not set",
                    var_name
                ))
            })?;
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        serde_yaml::from_str(&substituted).map_err(|e| FluxError::config(e.to_string()))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FluxError> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| FluxError::config(format!("Failed to read config file: {}", e)))?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), FluxError> {
        if self.host.is_empty() {
            return Err(FluxError::config("host cannot be empty"));
        }
        if self.host.contains("://") {
            return Err(FluxError::config(format!(
                "host '{}' must not include a scheme",
                self.host
            )));
        }
        if self.host.contains('/') {
            return Err(FluxError::config(format!(
                "host '{}' must not contain '/'",
                self.host
            )));
        }
        if self.ratio_scale == 0 || i32::try_from(self.ratio_scale).is_err() {
            return Err(FluxError::config(format!(
                "ratio_scale must be between 1 and {}, got {}",
                i32::MAX,
                self.ratio_scale
            )));
        }
        Ok(())
    }

    /// Parse settings described by this config
    pub fn parse_options(&self) -> Result<ParseOptions, FluxError> {
        let scale = i32::try_from(self.ratio_scale)
            .map_err(|_| FluxError::config("ratio_scale is out of range"))?;
        ParseOptions::new().strict(self.strict_keys).ratio_scale(scale)
    }

    /// Validates and builds the proxy
    pub fn proxy(&self) -> Result<Proxy, FluxError> {
        self.validate()?;
        let mut proxy = Proxy::new(self.host.clone()).with_options(self.parse_options()?);
        if let Some(secret) = &self.secret {
            proxy = proxy.with_secret(secret.clone());
        }
        Ok(proxy)
    }
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("host", &self.host)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("strict_keys", &self.strict_keys)
            .field("ratio_scale", &self.ratio_scale)
            .finish()
    }
}
