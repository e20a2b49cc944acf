//
//  se2-sdk
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for the administrative, builder and execution services
//!
//! This module provides the error type shared by every operation on
//! [`Se2Client`](crate::api::Se2Client), along with the helpers used to turn
//! remote error bodies into readable messages.
//!
//! # Overview
//!
//! - [`ApiError`] - Unified error type for all SDK operations
//! - [`Result`] - Convenience alias over [`ApiError`]
//! - [`ErrorBody`] - The `{code, message}` body returned by the executor
//!
//! # Example
//!
//! ```rust
//! use se2_sdk::api::common::ApiError;
//!
//! fn describe(err: &ApiError) -> String {
//!     match err {
//!         ApiError::Validation { message, .. } => format!("bad input: {}", message),
//!         ApiError::Execution { code, message } => format!("plugin failed [{}]: {}", code, message),
//!         e if e.is_not_found() => "no such resource".to_string(),
//!         e => e.to_string(),
//!     }
//! }
//! ```
//!
//! # Notes
//!
//! - Every variant raised by a remote call carries the operation name
//! - No variant is retried by the SDK; retry policy belongs to the caller

use std::path::PathBuf;

use reqwest::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Convenience alias used by every fallible SDK function.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Unified error type for all SDK operations.
///
/// # Variants
///
/// | Variant | Raised when | HTTP call made |
/// |---------|-------------|----------------|
/// | `InvalidConfig` | Endpoints missing or unparseable | No |
/// | `InvalidAccessKey` | Access key too short, not base64 or not key JSON | No |
/// | `Validation` | A required argument is blank or inconsistent | No |
/// | `Network` | Connection failure, timeout, body read failure | Yes |
/// | `UnexpectedStatus` | The service answered with another status than expected | Yes |
/// | `Decode` | The body does not match the expected schema | Yes |
/// | `Encode` | A request body could not be serialized | No |
/// | `EmptyToken` | The token endpoint answered with an empty token | Yes |
/// | `Execution` | The executor returned a structured `{code, message}` error | Yes |
/// | `ConfigFile` / `ConfigParse` | Reading or parsing `config.toml` failed | No |
#[derive(Error, Debug)]
pub enum ApiError {
    /// The client configuration is absent or invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The access key could not be validated.
    ///
    /// # Parameters
    ///
    /// - `0` - Why the key was rejected
    #[error("Invalid access key: {0}")]
    InvalidAccessKey(String),

    /// A required argument was blank or did not fit the request.
    #[error("{op}: {message}")]
    Validation {
        /// The operation that rejected its input.
        op: &'static str,
        /// Description of the offending argument.
        message: String,
    },

    /// A network-level error occurred during the request.
    ///
    /// This covers connection failures, timeouts, DNS resolution errors,
    /// and failures while reading the response body.
    #[error("{op}: network error: {source}")]
    Network {
        /// The operation that was in flight.
        op: &'static str,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a status other than the one the operation expects.
    #[error("{op}: expected HTTP {expected}, got {actual}: {message}")]
    UnexpectedStatus {
        /// The operation that received the response.
        op: &'static str,
        /// The status the operation requires.
        expected: u16,
        /// The status the service returned.
        actual: u16,
        /// Message extracted from the response body, or the raw body.
        message: String,
    },

    /// The response body did not match the expected schema.
    #[error("{op}: failed to decode response: {source}")]
    Decode {
        /// The operation whose response failed to decode.
        op: &'static str,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The request body could not be serialized. No request was sent.
    #[error("{op}: failed to encode request body: {source}")]
    Encode {
        /// The operation whose request body failed to encode.
        op: &'static str,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The token endpoint answered successfully but without a token.
    #[error("{op}: service returned an empty token")]
    EmptyToken {
        /// The operation that requested the token.
        op: &'static str,
    },

    /// The executor reported a failed plugin run.
    #[error("execution failed [{code}]: {message}")]
    Execution {
        /// Error code reported by the executor.
        code: i32,
        /// Error message reported by the executor.
        message: String,
    },

    /// The configuration file could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    ConfigFile {
        /// Path of the file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`SdkConfig`](crate::config::SdkConfig).
    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl ApiError {
    pub(crate) fn validation(op: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            op,
            message: message.into(),
        }
    }

    /// Returns the HTTP status carried by an [`ApiError::UnexpectedStatus`].
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::UnexpectedStatus { actual, .. } => StatusCode::from_u16(*actual).ok(),
            _ => None,
        }
    }

    /// Returns `true` when the service answered `404 Not Found`.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Returns `true` for errors raised before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::InvalidConfig(_) | Self::InvalidAccessKey(_)
        )
    }
}

/// Structured error body returned by the executor and the builder.
///
/// ```json
/// {"code": 404, "message": "module not found"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error code, usually mirroring the HTTP status.
    pub code: i32,

    /// Human-readable description.
    #[serde(alias = "string")]
    pub message: String,
}

/// Extracts a user-friendly message from an error response body.
///
/// The services answer errors in a few shapes:
///
/// ```json
/// {"code": 400, "message": "..."}
/// {"error": {"message": "..."}}
/// {"error": "..."}
/// ```
///
/// Falls back to the trimmed raw body, or the canonical status reason when
/// the body is empty.
pub fn error_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(json) = serde_json::from_slice::<serde_json::Value>(body) {
        if let Some(message) = json.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }

        if let Some(message) = json
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return message.to_string();
        }

        if let Some(message) = json.get("error").and_then(|e| e.as_str()) {
            return message.to_string();
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string()
    } else {
        text.to_string()
    }
}

/// Deserializes a missing or `null` list as an empty one.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
