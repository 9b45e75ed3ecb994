//! Simulator configuration
//!
//! Read from a TOML file; every key is optional.
//!
//! ```toml
//! host = "10.0.0.5"
//! port = 5000
//! http_url = "http://localhost:8080/api/iso8583"
//! timeout_secs = 5
//! include_tpdu = true
//! include_length_header = true
//! mask_sensitive = true
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::protocol::{Framing, Result};
use crate::{DEFAULT_HTTP_URL, DEFAULT_PORT};

/// Switch endpoints, framing defaults and display options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Switch host for TCP sends
    pub host: String,
    /// Switch port for TCP sends
    pub port: u16,
    /// Endpoint for HTTP posts
    pub http_url: String,
    /// Connect/read timeout for both transports, in seconds
    pub timeout_secs: u64,
    /// Prepend the TPDU header
    pub include_tpdu: bool,
    /// Prepend the 2-byte length header
    pub include_length_header: bool,
    /// Mask cardholder data in printed breakdowns
    pub mask_sensitive: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            http_url: DEFAULT_HTTP_URL.to_string(),
            timeout_secs: 5,
            include_tpdu: false,
            include_length_header: false,
            mask_sensitive: true,
        }
    }
}

impl SimulatorConfig {
    /// Parse TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read a config file
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_toml(&fs::read_to_string(path)?)
    }

    /// Read a config file if one is given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Framing flags as configured
    #[must_use]
    pub const fn framing(&self) -> Framing {
        Framing {
            include_tpdu: self.include_tpdu,
            include_length_header: self.include_length_header,
        }
    }

    /// Transport timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
