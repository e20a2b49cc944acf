//
//  se2-sdk
//  tests/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Shared setup for the scenario tests.
//!
//! Each test builds its own [`TestContext`]: one mock server standing in
//! for all three services, and a client pointed at it.

#![allow(dead_code)]

use se2_sdk::api::Se2Client;
use se2_sdk::config::Endpoints;

/// A well-formed access key (key id 407).
pub const ACCESS_KEY: &str = "eyJrZXkiOjQwNywic2VjcmV0IjoiZWsvNFV3VTBnZ2VHUjdQanF1MmlyaWJacGR1MXZvcWNhMXl3eDE3aWhpTT0ifQ==";

pub const ENVIRONMENT: &str = "com.suborbital";

/// Mock server plus a client talking to it.
pub struct TestContext {
    pub server: mockito::ServerGuard,
    pub client: Se2Client,
}

impl TestContext {
    pub async fn new() -> Self {
        let server = mockito::Server::new_async().await;
        let endpoints = Endpoints::single(&server.url()).expect("mock server URL");
        let client = Se2Client::new(endpoints, ACCESS_KEY).expect("client");
        Self { server, client }
    }

    /// The authorization header the client sends with the access key.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", ACCESS_KEY)
    }
}

/// A tenant body as the administrative API returns it.
pub fn tenant_json(name: &str, description: &str) -> String {
    serde_json::json!({
        "id": format!("id-{}", name),
        "authorized_party": "se2",
        "environment": ENVIRONMENT,
        "name": name,
        "description": description,
    })
    .to_string()
}

/// A tenant listing body.
pub fn tenants_json(names: &[&str]) -> String {
    let tenants: Vec<serde_json::Value> = names
        .iter()
        .map(|name| serde_json::from_str(&tenant_json(name, "")).expect("tenant json"))
        .collect();
    serde_json::json!({ "tenants": tenants }).to_string()
}
