//
//  se2-sdk
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Two credentials are in play:
//!
//! - **Access key**: an environment-level key issued from the admin area. It
//!   is a base64-encoded JSON blob `{"key": <int>, "secret": "<string>"}` and
//!   is sent verbatim as the bearer token on administrative, template and
//!   execution calls.
//! - **Session**: a short-lived token scoped to one tenant, namespace and
//!   plugin, obtained with
//!   [`Se2Client::create_session`](crate::api::Se2Client::create_session) and
//!   required by every draft operation on the builder.
//!
//! ## Example
//!
//! ```rust
//! use se2_sdk::auth::AccessKey;
//!
//! let raw = "eyJrZXkiOjQwNywic2VjcmV0IjoiZWsvNFV3VTBnZ2VHUjdQanF1MmlyaWJacGR1MXZvcWNhMXl3eDE3aWhpTT0ifQ==";
//! let key = AccessKey::parse(raw).unwrap();
//! assert_eq!(key.key_id(), 407);
//! ```

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::RequestBuilder;
use serde::Deserialize;

use crate::api::common::{ApiError, Result};
use crate::resource::Plugin;

/// Shortest encoded access key accepted.
pub const MIN_ACCESS_KEY_LENGTH: usize = 60;

/// Decoded shape of an access key.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct AccessKeyPayload {
    key: i64,
    secret: String,
}

/// A validated environment access key.
///
/// The raw encoded form is kept for use as the bearer token. `Debug` never
/// prints the secret.
#[derive(Clone)]
pub struct AccessKey {
    raw: String,
    key_id: i64,
}

impl AccessKey {
    /// Validates an encoded access key.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidAccessKey`] if the key is shorter than
    /// [`MIN_ACCESS_KEY_LENGTH`], is not standard base64, or does not decode
    /// to `{"key": <int>, "secret": "<string>"}` with a non-empty secret.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();

        if raw.len() < MIN_ACCESS_KEY_LENGTH {
            return Err(ApiError::InvalidAccessKey(format!(
                "expected at least {} characters, got {}",
                MIN_ACCESS_KEY_LENGTH,
                raw.len()
            )));
        }

        let decoded = STANDARD
            .decode(raw)
            .map_err(|e| ApiError::InvalidAccessKey(format!("not valid base64: {}", e)))?;

        let payload: AccessKeyPayload = serde_json::from_slice(&decoded)
            .map_err(|e| ApiError::InvalidAccessKey(format!("not a valid key payload: {}", e)))?;

        if payload.secret.is_empty() {
            return Err(ApiError::InvalidAccessKey("secret is empty".to_string()));
        }

        Ok(Self {
            raw: raw.to_string(),
            key_id: payload.key,
        })
    }

    /// The numeric key identifier.
    pub fn key_id(&self) -> i64 {
        self.key_id
    }

    /// The encoded key, as sent in the `Authorization` header.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Debug for AccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessKey")
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

/// A builder session scoped to one tenant, namespace and plugin.
///
/// The service only returns the token; the scope is remembered locally so
/// that [`Se2Client::promote_draft`](crate::api::Se2Client::promote_draft)
/// can refuse to promote into the wrong plugin.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    tenant: String,
    namespace: String,
    plugin: String,
}

impl Session {
    /// Wraps an existing session token.
    pub fn new(
        token: impl Into<String>,
        tenant: impl Into<String>,
        namespace: impl Into<String>,
        plugin: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            tenant: tenant.into(),
            namespace: namespace.into(),
            plugin: plugin.into(),
        }
    }

    /// The bearer token for builder calls.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The tenant this session is scoped to.
    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    /// The namespace this session is scoped to.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The plugin this session is scoped to.
    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    /// Whether this session addresses `plugin`.
    pub fn covers(&self, plugin: &Plugin) -> bool {
        self.tenant == plugin.tenant()
            && self.namespace == plugin.namespace()
            && self.plugin == plugin.name()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("tenant", &self.tenant)
            .field("namespace", &self.namespace)
            .field("plugin", &self.plugin)
            .finish_non_exhaustive()
    }
}

/// Which bearer token a request carries.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Credential<'a> {
    /// The environment-level access key.
    Environment,
    /// A builder session token.
    Session(&'a Session),
}

impl Credential<'_> {
    /// Adds the `Authorization: Bearer ...` header for this credential.
    pub(crate) fn apply_to_request(
        &self,
        request: RequestBuilder,
        access_key: &AccessKey,
    ) -> RequestBuilder {
        match self {
            Self::Environment => request.bearer_auth(access_key.as_str()),
            Self::Session(session) => request.bearer_auth(session.token()),
        }
    }
}
