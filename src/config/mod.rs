//
//  se2-sdk
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Client configuration comes from two places:
//!
//! - **Endpoints**: where the administrative, builder and execution APIs live
//!   (see [`Endpoints`])
//! - **Settings file**: an optional `config.toml` selecting endpoints,
//!   timeouts and an access key (see [`SdkConfig`])
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/se2/config.toml`
//! - **macOS**: `~/Library/Application Support/se2/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\se2\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! timeout_secs = 30
//! build_timeout_secs = 600
//!
//! [endpoints]
//! preset = "staging"
//! ```
//!
//! or with explicit URLs:
//!
//! ```toml
//! [endpoints]
//! admin = "http://localhost:8081"
//! builder = "http://localhost:8082"
//! execution = "http://localhost:8080"
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use se2_sdk::config::SdkConfig;
//! use se2_sdk::api::Se2Client;
//!
//! # fn main() -> se2_sdk::api::common::Result<()> {
//! let config = SdkConfig::load()?;
//! let client = Se2Client::builder().from_config(&config)?.build()?;
//! # Ok(())
//! # }
//! ```

mod endpoints;

pub use endpoints::*;

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::common::{ApiError, Result};

/// Environment variables consulted for the access key, in order.
pub const ACCESS_KEY_VARS: [&str; 3] = ["SE2_ENV_TOKEN", "EVERYTHING_TOKEN", "SCC_ENV_TOKEN"];

/// Default timeout for ordinary calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default timeout for synchronous builds, which can take minutes.
pub const DEFAULT_BUILD_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Settings loaded from `config.toml`.
///
/// Every field is optional; a missing file yields [`SdkConfig::default`],
/// which targets the local development stack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SdkConfig {
    /// Which services to talk to.
    #[serde(default)]
    pub endpoints: EndpointsConfig,

    /// Access key; usually left out in favour of an environment variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,

    /// Timeout for ordinary calls, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Timeout for synchronous builds, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_timeout_secs: Option<u64>,
}

/// The `[endpoints]` table.
///
/// Either a `preset` or all three explicit URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointsConfig {
    /// `local`, `production` or `staging`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    /// Administrative API base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<String>,

    /// Builder API base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builder: Option<String>,

    /// Execution API base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution: Option<String>,
}

impl EndpointsConfig {
    /// Resolves the table into validated [`Endpoints`].
    pub fn resolve(&self) -> Result<Endpoints> {
        match (&self.preset, &self.admin, &self.builder, &self.execution) {
            (Some(_), Some(_), _, _) | (Some(_), _, Some(_), _) | (Some(_), _, _, Some(_)) => Err(
                ApiError::InvalidConfig("endpoints: use either a preset or explicit URLs, not both".to_string()),
            ),
            (Some(preset), None, None, None) => match preset.as_str() {
                "local" => Ok(Endpoints::local()),
                "production" => Ok(Endpoints::from(ServerUrl::Production)),
                "staging" => Ok(Endpoints::from(ServerUrl::Staging)),
                other => Err(ApiError::InvalidConfig(format!(
                    "endpoints: unknown preset '{}'",
                    other
                ))),
            },
            (None, Some(admin), Some(builder), Some(execution)) => {
                Endpoints::custom(execution, admin, builder)
            }
            (None, None, None, None) => Ok(Endpoints::local()),
            _ => Err(ApiError::InvalidConfig(
                "endpoints: admin, builder and execution must all be set".to_string(),
            )),
        }
    }
}

impl SdkConfig {
    /// Loads the configuration from the default location.
    ///
    /// Returns defaults when the file does not exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads the configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ApiError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Path of the default configuration file.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "se2").ok_or_else(|| {
            ApiError::InvalidConfig("could not determine config directory".to_string())
        })?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Timeout for ordinary calls.
    pub fn timeout(&self) -> Duration {
        self.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Timeout for synchronous builds.
    pub fn build_timeout(&self) -> Duration {
        self.build_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_BUILD_TIMEOUT)
    }

    /// The access key from the file, else from the first set environment variable.
    pub fn access_key(&self) -> Option<String> {
        self.access_key.clone().or_else(Self::access_key_from_env)
    }

    /// Reads the access key from [`ACCESS_KEY_VARS`].
    pub fn access_key_from_env() -> Option<String> {
        ACCESS_KEY_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.trim().is_empty())
    }
}
