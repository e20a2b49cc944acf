//
//  se2-sdk
//  api/admin.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Administrative API: editor tokens, deployed plugin listings and execution results.
//!
//! # Routes
//!
//! | Operation | Route |
//! |-----------|-------|
//! | [`Se2Client::editor_token`] | `GET /api/v1/token/{env}.{tenant}/{namespace}/{name}` |
//! | [`Se2Client::user_plugins`] | `GET /api/v2/functions/{env}.{tenant}/{namespace}` |
//! | [`Se2Client::get_tenant_plugins`] | `GET /environment/v1/tenant/{name}/plugins` |
//! | [`Se2Client::results_metadata`] | `GET /api/v2/results/by-fqfn/{env}.{tenant}/{namespace}/{name}` |
//! | [`Se2Client::result_metadata`] | `GET /api/v2/results/by-uuid/{uuid}` |
//! | [`Se2Client::function_result`] | `GET /api/v2/result/{uuid}` |
//!
//! Empty listings come back as empty vectors, never as errors.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::client::{require, Call, Se2Client, Service};
use crate::api::common::{null_as_empty, ApiError, ErrorBody, Result};
use crate::resource::Plugin;

/// Body of the token endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct TokenResponse {
    #[serde(default)]
    token: String,
}

/// A deployed plugin as reported by the listing endpoints.
///
/// The administrative listing and the tenant listing use slightly different
/// keys (`fqfn`/`version` versus `fqmn`/`ref`); both decode into this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeployedPlugin {
    /// Plugin name.
    pub name: String,

    /// Namespace the plugin lives in.
    pub namespace: String,

    /// Source language, e.g. `rust` or `javascript`.
    #[serde(default)]
    pub lang: String,

    /// Live version or deployment reference.
    #[serde(default, rename = "ref", alias = "version")]
    pub reference: String,

    /// Version of the pending draft, if any.
    #[serde(default, rename = "draftVersion", skip_serializing_if = "Option::is_none")]
    pub draft_version: Option<String>,

    /// Plugin API version the module was built against.
    #[serde(default, rename = "apiVersion")]
    pub api_version: String,

    /// Fully-qualified name.
    #[serde(default, alias = "fqfn")]
    pub fqmn: String,

    /// Canonical URI, when the service provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl DeployedPlugin {
    /// Rebuilds the resource identifier from the entry's name.
    ///
    /// `fqfn` style names are tried first, then `fqmn://` names, then the
    /// entry's `uri`. Returns `None` when none of them parse.
    pub fn to_plugin(&self) -> Option<Plugin> {
        let plugin = Plugin::from_fqfn(&self.fqmn)
            .or_else(|| Plugin::from_fqmn(&self.fqmn))
            .or_else(|| self.uri.as_deref().and_then(Plugin::from_fqmn))?;
        if plugin.version().is_none() && !self.reference.is_empty() {
            return Some(plugin.with_version(self.reference.clone()));
        }
        Some(plugin)
    }
}

/// Body of both listing endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeployedPluginList {
    #[serde(default, alias = "functions", deserialize_with = "null_as_empty")]
    plugins: Vec<DeployedPlugin>,
}

/// Metadata of one stored execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecMetadata {
    /// Execution identifier.
    pub uuid: String,

    /// When the execution happened.
    pub timestamp: DateTime<Utc>,

    /// Whether the plugin returned without error.
    #[serde(default)]
    pub success: bool,

    /// The error the plugin returned, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,

    /// The stored response body, when the service inlines it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,

    /// Headers the plugin set on its response.
    #[serde(default, rename = "responseHeaders", skip_serializing_if = "Option::is_none")]
    pub response_headers: Option<HashMap<String, String>>,
}

/// Checks that every part of a plugin identifier is set.
pub(crate) fn require_plugin(op: &'static str, plugin: &Plugin) -> Result<()> {
    require(op, "environment", plugin.environment())?;
    require(op, "tenant", plugin.tenant())?;
    require(op, "namespace", plugin.namespace())?;
    require(op, "plugin name", plugin.name())
}

/// The path segments of [`Plugin::uri`].
pub(crate) fn plugin_segments(plugin: &Plugin) -> [String; 3] {
    [
        plugin.identifier(),
        plugin.namespace().to_string(),
        plugin.name().to_string(),
    ]
}

impl Se2Client {
    /// Fetches a short-lived editor token for `plugin`.
    ///
    /// # Errors
    ///
    /// Besides validation, transport, status and decode errors, returns
    /// [`ApiError::EmptyToken`] when the service answers without a token.
    pub async fn editor_token(&self, plugin: &Plugin) -> Result<String> {
        const OP: &str = "editor_token";
        require_plugin(OP, plugin)?;

        let response: TokenResponse = self
            .fetch(Call::get(OP, Service::Admin, "/api/v1/token").segments(plugin_segments(plugin)))
            .await?;

        if response.token.is_empty() {
            return Err(ApiError::EmptyToken { op: OP });
        }

        Ok(response.token)
    }

    /// Lists the plugins deployed under `{environment}.{tenant}` in `namespace`.
    pub async fn user_plugins(
        &self,
        environment: &str,
        tenant: &str,
        namespace: &str,
    ) -> Result<Vec<DeployedPlugin>> {
        const OP: &str = "user_plugins";
        require(OP, "environment", environment)?;
        require(OP, "tenant", tenant)?;
        require(OP, "namespace", namespace)?;

        let list: DeployedPluginList = self
            .fetch(
                Call::get(OP, Service::Admin, "/api/v2/functions")
                    .segment(format!("{}.{}", environment, tenant))
                    .segment(namespace),
            )
            .await?;

        Ok(list.plugins)
    }

    /// Lists every plugin deployed for a tenant.
    pub async fn get_tenant_plugins(&self, tenant: &str) -> Result<Vec<DeployedPlugin>> {
        const OP: &str = "get_tenant_plugins";
        require(OP, "tenant name", tenant)?;

        let list: DeployedPluginList = self
            .fetch(
                Call::get(OP, Service::Admin, "/environment/v1/tenant")
                    .segment(tenant)
                    .segment("plugins"),
            )
            .await?;

        Ok(list.plugins)
    }

    /// Metadata for the most recent executions of `plugin` (the service keeps five).
    pub async fn results_metadata(&self, plugin: &Plugin) -> Result<Vec<ExecMetadata>> {
        const OP: &str = "results_metadata";
        require_plugin(OP, plugin)?;

        let results: Option<Vec<ExecMetadata>> = self
            .fetch(Call::get(OP, Service::Admin, "/api/v2/results/by-fqfn").segments(plugin_segments(plugin)))
            .await?;

        Ok(results.unwrap_or_default())
    }

    /// Metadata for one execution. An unknown `uuid` is a not-found error.
    pub async fn result_metadata(&self, uuid: &str) -> Result<ExecMetadata> {
        const OP: &str = "result_metadata";
        require(OP, "execution uuid", uuid)?;

        self.fetch(Call::get(OP, Service::Admin, "/api/v2/results/by-uuid").segment(uuid))
            .await
    }

    /// The stored output of one execution, as raw bytes.
    pub async fn function_result(&self, uuid: &str) -> Result<Vec<u8>> {
        const OP: &str = "function_result";
        require(OP, "execution uuid", uuid)?;

        let response = self
            .execute(Call::get(OP, Service::Admin, "/api/v2/result").segment(uuid))
            .await?;

        Ok(response.body)
    }
}
