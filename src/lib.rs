//
//  se2-sdk
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # SE2 SDK
//!
//! An async client library for the SE2 plugin platform: manage tenants,
//! edit and build plugins through builder sessions, promote drafts and run
//! deployed plugins.
//!
//! ## Features
//!
//! - **One client**: a single [`Se2Client`](api::Se2Client) addresses the
//!   administrative, builder and execution services
//! - **Validated credentials**: access keys are decoded and checked when the
//!   client is built
//! - **Typed results**: strict decoding of every success body, typed errors
//!   for status, decode and plugin failures
//! - **No hidden retries**: each call is exactly one HTTP round trip
//!
//! ## Module Structure
//!
//! - [`api`]: The client and every remote operation
//! - [`auth`]: Access keys and builder sessions
//! - [`config`]: Endpoints and the optional `config.toml`
//! - [`Plugin`]: The resource identifier used to address plugins
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use se2_sdk::api::Se2Client;
//! use se2_sdk::config::Endpoints;
//! use se2_sdk::Plugin;
//!
//! # async fn demo() -> se2_sdk::api::common::Result<()> {
//! let key = std::env::var("SE2_ENV_TOKEN").unwrap_or_default();
//! let client = Se2Client::new(Endpoints::local(), &key)?;
//!
//! let plugin = Plugin::new("com.suborbital", "acmeco", "default", "hello");
//! let response = client.exec(&plugin, "world").await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

/// The SE2 client and its operations.
pub mod api;

/// Access keys and builder sessions.
pub mod auth;

/// Endpoint and file configuration.
pub mod config;

mod resource;

pub use resource::Plugin;

/// Library version constant.
///
/// Derived from Cargo.toml at compile time and sent in the default
/// `User-Agent` header.
///
/// ```rust
/// use se2_sdk::VERSION;
///
/// println!("se2-sdk {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
