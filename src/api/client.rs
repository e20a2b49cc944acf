//
//  se2-sdk
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client Wrapper for the SE2 APIs
//!
//! This module provides the core HTTP client shared by every remote
//! operation. It owns the service endpoints and the access key, and turns a
//! [`Call`] description into one HTTP round trip.
//!
//! ## Features
//!
//! - One client for the administrative, builder and execution services
//! - Bearer authentication with the access key or a session token
//! - Expected-status checking with messages extracted from error bodies
//! - Strict JSON decoding of success bodies
//! - Bodies are always read to the end, so connections are returned to the pool
//!
//! The client never retries. Cancelling a call means dropping its future
//! (for example through `tokio::time::timeout`); nothing is mutated locally
//! unless the remote call completed and decoded.

use std::time::Duration;

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::api::common::{error_message, ApiError, Result};
use crate::auth::{AccessKey, Credential};
use crate::config::{Endpoints, SdkConfig, ServerUrl, DEFAULT_BUILD_TIMEOUT, DEFAULT_TIMEOUT};

/// The remote service a call is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Service {
    Admin,
    Builder,
    Execution,
}

/// Request body of a [`Call`].
#[derive(Debug)]
enum Payload {
    Json(Vec<u8>),
    Raw(Vec<u8>),
}

/// Description of one remote operation.
///
/// `path` holds the fixed part of the route; `segments` are appended one by
/// one and percent-encoded, so user-supplied names cannot change the route.
#[derive(Debug)]
pub(crate) struct Call<'a> {
    op: &'static str,
    method: Method,
    service: Service,
    path: &'static str,
    segments: Vec<String>,
    credential: Credential<'a>,
    payload: Option<Payload>,
    expected: StatusCode,
    timeout: Option<Duration>,
}

impl<'a> Call<'a> {
    pub(crate) fn new(op: &'static str, method: Method, service: Service, path: &'static str) -> Self {
        Self {
            op,
            method,
            service,
            path,
            segments: Vec::new(),
            credential: Credential::Environment,
            payload: None,
            expected: StatusCode::OK,
            timeout: None,
        }
    }

    pub(crate) fn get(op: &'static str, service: Service, path: &'static str) -> Self {
        Self::new(op, Method::GET, service, path)
    }

    pub(crate) fn post(op: &'static str, service: Service, path: &'static str) -> Self {
        Self::new(op, Method::POST, service, path)
    }

    pub(crate) fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub(crate) fn segments<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.segments.extend(segments.into_iter().map(Into::into));
        self
    }

    pub(crate) fn credential(mut self, credential: Credential<'a>) -> Self {
        self.credential = credential;
        self
    }

    pub(crate) fn json<B: Serialize>(mut self, body: &B) -> Result<Self> {
        let encoded = serde_json::to_vec(body).map_err(|source| ApiError::Encode {
            op: self.op,
            source,
        })?;
        self.payload = Some(Payload::Json(encoded));
        Ok(self)
    }

    pub(crate) fn raw(mut self, body: Vec<u8>) -> Self {
        self.payload = Some(Payload::Raw(body));
        self
    }

    pub(crate) fn expect(mut self, status: StatusCode) -> Self {
        self.expected = status;
        self
    }

    pub(crate) fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A fully read response.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub(crate) status: StatusCode,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Vec<u8>,
}

/// Decodes a success body, rejecting unknown fields where the type asks for it.
pub(crate) fn decode<T: DeserializeOwned>(op: &'static str, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|source| ApiError::Decode { op, source })
}

/// Rejects blank required arguments before any request is made.
pub(crate) fn require(op: &'static str, what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(op, format!("{} cannot be blank", what)));
    }
    Ok(())
}

/// The client for the SE2 administrative, builder and execution APIs.
///
/// # Creating a Client
///
/// ```rust,no_run
/// use se2_sdk::api::Se2Client;
/// use se2_sdk::config::{Endpoints, ServerUrl};
///
/// # fn main() -> se2_sdk::api::common::Result<()> {
/// let key = std::env::var("SE2_ENV_TOKEN").unwrap_or_default();
///
/// // Hosted staging
/// let client = Se2Client::new(ServerUrl::Staging, &key)?;
///
/// // Local docker-compose stack, with a shorter timeout
/// let local = Se2Client::builder()
///     .endpoints(Endpoints::local())
///     .access_key(&key)
///     .timeout(std::time::Duration::from_secs(10))
///     .build()?;
/// # Ok(())
/// # }
/// ```
///
/// Construction validates the access key; see
/// [`AccessKey::parse`](crate::auth::AccessKey::parse).
#[derive(Debug, Clone)]
pub struct Se2Client {
    /// The underlying HTTP client
    http: Client,
    /// Base URLs of the three services
    endpoints: Endpoints,
    /// Environment-level credential
    access_key: AccessKey,
    /// Per-request timeout for synchronous builds
    build_timeout: Duration,
}

impl Se2Client {
    /// Creates a client with default settings.
    pub fn new(endpoints: impl Into<Endpoints>, access_key: &str) -> Result<Self> {
        Self::builder()
            .endpoints(endpoints.into())
            .access_key(access_key)
            .build()
    }

    /// Creates a client for the local development stack.
    pub fn local(access_key: &str) -> Result<Self> {
        Self::new(Endpoints::local(), access_key)
    }

    /// Starts a [`ClientBuilder`].
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// The service endpoints this client talks to.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// The timeout applied to synchronous builds.
    pub fn build_timeout(&self) -> Duration {
        self.build_timeout
    }

    fn base(&self, service: Service) -> &Url {
        match service {
            Service::Admin => &self.endpoints.admin,
            Service::Builder => &self.endpoints.builder,
            Service::Execution => &self.endpoints.execution,
        }
    }

    fn url(&self, call: &Call<'_>) -> Result<Url> {
        let mut url = self.base(call.service).clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ApiError::InvalidConfig(format!(
                    "{} cannot be used as a base URL",
                    self.base(call.service)
                ))
            })?;
            segments.pop_if_empty();
            for part in call.path.split('/').filter(|p| !p.is_empty()) {
                segments.push(part);
            }
            for part in &call.segments {
                segments.push(part);
            }
        }
        Ok(url)
    }

    /// Performs the round trip and reads the whole body.
    ///
    /// Transport failures, including failures while reading the body, are
    /// returned as [`ApiError::Network`]. The status is not checked.
    pub(crate) async fn send(&self, call: Call<'_>) -> Result<RawResponse> {
        let url = self.url(&call)?;
        let op = call.op;

        tracing::debug!(op, method = %call.method, %url, "sending request");

        let mut request = self.http.request(call.method.clone(), url);
        request = call.credential.apply_to_request(request, &self.access_key);

        match call.payload {
            Some(Payload::Json(body)) => {
                request = request.header(CONTENT_TYPE, "application/json").body(body);
            }
            Some(Payload::Raw(body)) => {
                request = request.body(body);
            }
            None => {}
        }

        if let Some(timeout) = call.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|source| ApiError::Network { op, source })?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|source| ApiError::Network { op, source })?
            .to_vec();

        tracing::debug!(op, status = status.as_u16(), bytes = body.len(), "received response");

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }

    /// Performs the call and checks the status against the expected one.
    pub(crate) async fn execute(&self, call: Call<'_>) -> Result<RawResponse> {
        let op = call.op;
        let expected = call.expected;
        let response = self.send(call).await?;

        if response.status != expected {
            let message = error_message(response.status, &response.body);
            tracing::warn!(
                op,
                expected = expected.as_u16(),
                actual = response.status.as_u16(),
                %message,
                "unexpected response status"
            );
            return Err(ApiError::UnexpectedStatus {
                op,
                expected: expected.as_u16(),
                actual: response.status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    /// Performs the call, checks the status and decodes the body.
    pub(crate) async fn fetch<T: DeserializeOwned>(&self, call: Call<'_>) -> Result<T> {
        let op = call.op;
        let response = self.execute(call).await?;
        decode(op, &response.body)
    }
}

/// Builder for [`Se2Client`].
///
/// Replaces option functions with chained setters. Every setter is optional
/// except [`endpoints`](Self::endpoints) and [`access_key`](Self::access_key).
///
/// ```rust,no_run
/// use std::time::Duration;
/// use se2_sdk::api::Se2Client;
/// use se2_sdk::config::ServerUrl;
///
/// # fn main() -> se2_sdk::api::common::Result<()> {
/// let http = reqwest::Client::builder()
///     .timeout(Duration::from_secs(5))
///     .build()
///     .expect("http client");
///
/// let client = Se2Client::builder()
///     .server(ServerUrl::Production)
///     .access_key("eyJrZXkiOjQwNywic2VjcmV0IjoiZWsvNFV3VTBnZ2VHUjdQanF1MmlyaWJacGR1MXZvcWNhMXl3eDE3aWhpTT0ifQ==")
///     .http_client(http)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ClientBuilder {
    endpoints: Option<Endpoints>,
    access_key: Option<String>,
    timeout: Duration,
    build_timeout: Duration,
    user_agent: String,
    http: Option<Client>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            endpoints: None,
            access_key: None,
            timeout: DEFAULT_TIMEOUT,
            build_timeout: DEFAULT_BUILD_TIMEOUT,
            user_agent: format!("se2-sdk/{}", crate::VERSION),
            http: None,
        }
    }
}

impl ClientBuilder {
    /// Sets the service endpoints.
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = Some(endpoints);
        self
    }

    /// Targets a hosted deployment.
    pub fn server(self, server: ServerUrl) -> Self {
        self.endpoints(Endpoints::from(server))
    }

    /// Sets the encoded access key.
    pub fn access_key(mut self, access_key: impl Into<String>) -> Self {
        self.access_key = Some(access_key.into());
        self
    }

    /// Sets the timeout for ordinary calls. Ignored when an HTTP client is supplied.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the per-request timeout for synchronous builds.
    pub fn build_timeout(mut self, timeout: Duration) -> Self {
        self.build_timeout = timeout;
        self
    }

    /// Sets the `User-Agent` header. Ignored when an HTTP client is supplied.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Replaces the underlying HTTP transport.
    pub fn http_client(mut self, http: Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Applies the settings from a configuration file.
    ///
    /// Values already set on the builder for the access key are kept.
    pub fn from_config(mut self, config: &SdkConfig) -> Result<Self> {
        self.endpoints = Some(config.endpoints.resolve()?);
        self.timeout = config.timeout();
        self.build_timeout = config.build_timeout();
        if self.access_key.is_none() {
            self.access_key = config.access_key();
        }
        Ok(self)
    }

    /// Validates the settings and creates the client.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidConfig`] when no endpoints were set or the HTTP
    ///   client cannot be created
    /// - [`ApiError::InvalidAccessKey`] when the key is missing or invalid
    pub fn build(self) -> Result<Se2Client> {
        let endpoints = self
            .endpoints
            .ok_or_else(|| ApiError::InvalidConfig("endpoints must be set".to_string()))?;

        let access_key = self
            .access_key
            .ok_or_else(|| ApiError::InvalidAccessKey("no access key provided".to_string()))?;
        let access_key = AccessKey::parse(&access_key)?;

        let http = match self.http {
            Some(http) => http,
            None => Client::builder()
                .user_agent(self.user_agent)
                .timeout(self.timeout)
                .build()
                .map_err(|e| ApiError::InvalidConfig(format!("failed to create HTTP client: {}", e)))?,
        };

        Ok(Se2Client {
            http,
            endpoints,
            access_key,
            build_timeout: self.build_timeout,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const ACCESS_KEY: &str = "eyJrZXkiOjQwNywic2VjcmV0IjoiZWsvNFV3VTBnZ2VHUjdQanF1MmlyaWJacGR1MXZvcWNhMXl3eDE3aWhpTT0ifQ==";

    /// A client whose three services all point at one mock server.
    pub(crate) fn client_for(server: &mockito::Server) -> Se2Client {
        Se2Client::new(Endpoints::single(&server.url()).unwrap(), ACCESS_KEY).unwrap()
    }

    #[test]
    fn test_build_requires_endpoints() {
        let err = Se2Client::builder().access_key(ACCESS_KEY).build().unwrap_err();
        assert!(matches!(err, ApiError::InvalidConfig(_)));
    }

    #[test]
    fn test_build_requires_access_key() {
        let err = Se2Client::builder()
            .endpoints(Endpoints::local())
            .build()
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidAccessKey(_)));

        let err = Se2Client::local("short").unwrap_err();
        assert!(matches!(err, ApiError::InvalidAccessKey(_)));
    }

    #[test]
    fn test_build_with_defaults() {
        let client = Se2Client::new(ServerUrl::Production, ACCESS_KEY).unwrap();
        assert_eq!(client.build_timeout(), DEFAULT_BUILD_TIMEOUT);
        assert_eq!(client.endpoints(), &Endpoints::from(ServerUrl::Production));
    }

    #[test]
    fn test_url_encodes_segments() {
        let client = Se2Client::new(
            Endpoints::single("http://example.com/prefix/").unwrap(),
            ACCESS_KEY,
        )
        .unwrap();
        let call = Call::get("test", Service::Admin, "/environment/v1/tenant").segment("a b/c");
        let url = client.url(&call).unwrap();
        assert_eq!(
            url.as_str(),
            "http://example.com/prefix/environment/v1/tenant/a%20b%2Fc"
        );
    }

    #[test]
    fn test_require_rejects_blank() {
        assert!(require("op", "tenant name", "").is_err());
        assert!(require("op", "tenant name", "   ").is_err());
        assert!(require("op", "tenant name", "t1").is_ok());
    }

    #[test]
    fn test_unserializable_body_is_encode_error() {
        let mut body = std::collections::BTreeMap::new();
        body.insert((1u8, 2u8), "tuple keys are not valid JSON object keys");

        let err = Call::post("create_tenant", Service::Admin, "/environment/v1/tenant")
            .json(&body)
            .unwrap_err();
        assert!(matches!(err, ApiError::Encode { op: "create_tenant", .. }));
        assert!(err.to_string().contains("failed to encode request body"));
    }

    #[tokio::test]
    async fn test_unexpected_status_carries_message() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/health")
            .match_header("authorization", format!("Bearer {}", ACCESS_KEY).as_str())
            .with_status(503)
            .with_body(r#"{"message": "builder is warming up"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client
            .execute(Call::get("builder_health", Service::Builder, "/api/v1/health"))
            .await
            .unwrap_err();

        match err {
            ApiError::UnexpectedStatus {
                expected,
                actual,
                message,
                ..
            } => {
                assert_eq!(expected, 200);
                assert_eq!(actual, 503);
                assert_eq!(message, "builder is warming up");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_network_error_is_classified() {
        let client = Se2Client::new(
            Endpoints::single("http://127.0.0.1:1").unwrap(),
            ACCESS_KEY,
        )
        .unwrap();
        let err = client
            .send(Call::get("builder_health", Service::Builder, "/api/v1/health"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Network { op: "builder_health", .. }));
    }
}
