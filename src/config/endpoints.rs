//
//  se2-sdk
//  config/endpoints.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Endpoint Configuration Module
//!
//! The SDK talks to three services: the administrative API (tokens,
//! listings, results, tenants, sessions), the builder (templates, drafts,
//! builds) and the executor. [`Endpoints`] holds one validated base URL for
//! each.
//!
//! ## Presets
//!
//! | Constructor | Administrative | Builder | Execution |
//! |-------------|----------------|---------|-----------|
//! | [`Endpoints::local`] | `:8081` | `:8082` | `:8080` |
//! | [`Endpoints::cluster`] | control plane service `:8081` | given URL, scheme forced to https | atmo service `:80` |
//! | [`Endpoints::single`] | host | host | host |
//! | [`Endpoints::custom`] | given | given | given |
//!
//! ## Usage
//!
//! ```rust
//! use se2_sdk::config::{Endpoints, ServerUrl};
//!
//! let local = Endpoints::local();
//! assert_eq!(local.admin.as_str(), "http://local.suborbital.network:8081/");
//!
//! let staging = Endpoints::from(ServerUrl::Staging);
//! assert_eq!(staging.admin, staging.builder);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::common::{ApiError, Result};

/// Hostname used by the docker-compose development stack.
pub const LOCAL_HOST: &str = "local.suborbital.network";

/// Hosted production API.
pub const PRODUCTION_HOST: &str = "https://api.suborbital.network";

/// Hosted staging API.
pub const STAGING_HOST: &str = "https://stg.api.suborbital.network";

const CLUSTER_EXECUTION: &str = "http://scc-atmo-service.suborbital.svc.cluster.local:80";
const CLUSTER_ADMIN: &str = "http://scc-controlplane-service.suborbital.svc.cluster.local:8081";

/// A hosted deployment where one host serves every API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerUrl {
    /// The production deployment.
    Production,
    /// The staging deployment.
    Staging,
}

impl ServerUrl {
    /// The base URL of this deployment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_HOST,
            Self::Staging => STAGING_HOST,
        }
    }
}

impl fmt::Display for ServerUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three service base URLs a client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Administrative API: tokens, listings, results, tenants, sessions.
    pub admin: Url,
    /// Builder API: features, templates, drafts, builds.
    pub builder: Url,
    /// Execution API: running deployed plugins.
    pub execution: Url,
}

impl Endpoints {
    /// Endpoints for the docker-compose development stack.
    pub fn local() -> Self {
        let at = |port: u16| {
            Url::parse(&format!("http://{}:{}", LOCAL_HOST, port)).expect("static URL")
        };

        Self {
            admin: at(8081),
            builder: at(8082),
            execution: at(8080),
        }
    }

    /// Endpoints from inside the cluster, with the given public builder host.
    ///
    /// The scheme of `builder_host` is always forced to https; host, port
    /// and path are kept as given.
    pub fn cluster(builder_host: &str) -> Result<Self> {
        let mut builder = parse("builder", builder_host)?;
        builder
            .set_scheme("https")
            .map_err(|_| ApiError::InvalidConfig(format!("cannot use https for builder URL '{}'", builder_host)))?;

        Ok(Self {
            admin: parse("admin", CLUSTER_ADMIN)?,
            builder,
            execution: parse("execution", CLUSTER_EXECUTION)?,
        })
    }

    /// Endpoints from three explicit URLs.
    pub fn custom(execution: &str, admin: &str, builder: &str) -> Result<Self> {
        Ok(Self {
            admin: parse("admin", admin)?,
            builder: parse("builder", builder)?,
            execution: parse("execution", execution)?,
        })
    }

    /// Endpoints where a single host serves every API.
    pub fn single(host: &str) -> Result<Self> {
        let url = parse("host", host)?;
        Ok(Self {
            admin: url.clone(),
            builder: url.clone(),
            execution: url,
        })
    }
}

impl From<ServerUrl> for Endpoints {
    fn from(server: ServerUrl) -> Self {
        Self::single(server.as_str()).expect("preset hosts are valid URLs")
    }
}

fn parse(which: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ApiError::InvalidConfig(format!("invalid {} URL '{}': {}", which, raw, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ApiError::InvalidConfig(format!(
            "{} URL must be http or https, got '{}'",
            which, other
        ))),
    }
}
