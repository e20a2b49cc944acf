//
//  se2-sdk
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the client for the three SE2 services.
//!
//! ## Services
//!
//! - **Administrative API**: tenants, sessions, editor tokens, deployed plugins, results
//! - **Builder API**: templates, drafts, builds, tests, promotion
//! - **Execution API**: running deployed plugins
//!
//! ## Architecture
//!
//! - [`client`]: Core HTTP client with authentication and request handling
//! - [`common`]: Shared error type and error-body parsing
//! - `admin`, `session`, `builder`, `execution`, `tenants`, `templates`:
//!   the operations, each as methods on [`Se2Client`]
//!
//! ## Usage
//!
//! ```rust,no_run
//! use se2_sdk::api::Se2Client;
//! use se2_sdk::config::ServerUrl;
//!
//! # async fn demo() -> se2_sdk::api::common::Result<()> {
//! let key = std::env::var("SE2_ENV_TOKEN").unwrap_or_default();
//! let client = Se2Client::new(ServerUrl::Staging, &key)?;
//!
//! for tenant in client.list_tenants().await? {
//!     println!("{} - {}", tenant.name, tenant.description);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`ApiError`]. Validation errors are raised before
//! any request; `UnexpectedStatus` carries the expected and actual status;
//! `Execution` carries the executor's `{code, message}`.

/// Core HTTP client for the SE2 services.
pub mod client;

/// Error type shared by every operation.
pub mod common;

mod admin;
mod builder;
mod execution;
mod session;
mod templates;
mod tenants;

pub use admin::{DeployedPlugin, ExecMetadata};
pub use builder::{BuildResult, BuilderFeatures, Draft, Language, PromoteResponse, TestResult};
pub use client::{ClientBuilder, Se2Client};
pub use common::{ApiError, ErrorBody};
pub use execution::{ExecResponse, REQUEST_ID_HEADER};
pub use templates::Template;
pub use tenants::Tenant;
