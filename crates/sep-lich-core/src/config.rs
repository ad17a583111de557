// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Method channel name the Flutter side talks to.
pub const DEFAULT_CHANNEL: &str = "com.example.sep_lich/alarm";

/// Settings handed over by the host app when the bridge is initialised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Method channel name (default `com.example.sep_lich/alarm`).
    pub channel: String,
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            channel: DEFAULT_CHANNEL.to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl BridgeConfig {
    /// Parse a JSON config. Missing fields keep their defaults and a blank
    /// string yields the default config.
    pub fn from_json(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(text)?)
    }

    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SepLichError;

    #[test]
    fn blank_json_is_default() {
        assert_eq!(BridgeConfig::from_json("  \n").unwrap(), BridgeConfig::default());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = BridgeConfig::from_json(r#"{"log_filter": "sep_lich_bridge=debug"}"#).unwrap();
        assert_eq!(config.channel, DEFAULT_CHANNEL);
        assert_eq!(config.log_filter, "sep_lich_bridge=debug");
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = BridgeConfig::from_json("{channel").unwrap_err();
        assert!(matches!(err, SepLichError::Serialization(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bridge.json");
        std::fs::write(&path, r#"{"channel": "org.example/alarm"}"#).unwrap();

        let config = BridgeConfig::load(&path).unwrap();
        assert_eq!(config.channel, "org.example/alarm");
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = BridgeConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SepLichError::Io(_)));
    }
}
