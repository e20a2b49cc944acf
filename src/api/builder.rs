//
//  se2-sdk
//  api/builder.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Builder API
//!
//! Draft editing, synchronous builds, draft tests and promotion. Every draft
//! operation is authenticated with a [`Session`] rather than the access key.
//!
//! ## Lifecycle
//!
//! ```text
//! create_session ─► create_plugin_draft ─► build_plugin ─┬─► promote_draft
//!                                                         └─► test_plugin_draft
//! ```
//!
//! A failed build is a normal [`BuildResult`] with `succeeded == false`, not
//! an error. Only [`Se2Client::promote_draft`] changes what is live.
//!
//! ## Example
//!
//! ```rust,no_run
//! use se2_sdk::Plugin;
//!
//! # async fn demo(client: &se2_sdk::api::Se2Client) -> se2_sdk::api::common::Result<()> {
//! let mut plugin = Plugin::new("com.suborbital", "acmeco", "default", "hello");
//! let session = client.create_session("acmeco", "default", "hello").await?;
//!
//! let draft = client.create_plugin_draft("assemblyscript", &session).await?;
//! let build = client.build_plugin(draft.contents, &session).await?;
//! if !build.succeeded {
//!     eprintln!("{}", build.output_log);
//!     return Ok(());
//! }
//!
//! let promoted = client.promote_draft(&mut plugin, &session).await?;
//! assert_eq!(plugin.version(), Some(promoted.reference.as_str()));
//! # Ok(())
//! # }
//! ```

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::api::client::{require, Call, Se2Client, Service};
use crate::api::common::{null_as_empty, ApiError, Result};
use crate::auth::{Credential, Session};
use crate::resource::Plugin;

const DRAFT_PATH: &str = "/builder/v1/draft";

/// Capabilities advertised by the builder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuilderFeatures {
    /// Feature flags, e.g. `test`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub features: Vec<String>,

    /// Languages the builder can compile.
    #[serde(default, alias = "Languages", deserialize_with = "null_as_empty")]
    pub languages: Vec<Language>,
}

/// A language supported by the builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Language {
    /// Machine identifier, e.g. `tinygo`.
    pub identifier: String,

    /// Short display name.
    #[serde(default)]
    pub short: String,

    /// Long display name.
    #[serde(default)]
    pub pretty: String,
}

/// The current draft of a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Draft {
    /// Source language.
    pub lang: String,

    /// Source code.
    pub contents: String,
}

/// Outcome of a synchronous build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildResult {
    /// Whether the module compiled.
    pub succeeded: bool,

    /// Compiler output.
    #[serde(default, rename = "outputLog")]
    pub output_log: String,
}

/// Outcome of running the draft against a test input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestResult {
    /// What the plugin returned.
    #[serde(default)]
    pub result: String,

    /// Error raised by the plugin, empty on success.
    #[serde(default)]
    pub error: String,
}

/// Response to a promotion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PromoteResponse {
    /// The reference of the version that is now live.
    #[serde(rename = "ref", alias = "version")]
    pub reference: String,
}

#[derive(Debug, Serialize)]
struct CreateDraftRequest<'a> {
    template: &'a str,
}

impl Se2Client {
    /// Whether the builder is up.
    ///
    /// Returns `Ok(false)` when the builder answers with any non-200 status;
    /// transport failures are still errors.
    pub async fn builder_health(&self) -> Result<bool> {
        let response = self
            .send(Call::get("builder_health", Service::Builder, "/api/v1/health"))
            .await?;
        Ok(response.status == StatusCode::OK)
    }

    /// The builder's feature flags and supported languages.
    pub async fn builder_features(&self) -> Result<BuilderFeatures> {
        self.fetch(Call::get(
            "builder_features",
            Service::Builder,
            "/builder/v1/features",
        ))
        .await
    }

    /// Resets the session's draft to the starter code of a template.
    ///
    /// # Parameters
    ///
    /// - `template` - Template name, see [`Se2Client::list_templates`]
    /// - `session` - Session for the plugin being edited
    pub async fn create_plugin_draft(&self, template: &str, session: &Session) -> Result<Draft> {
        const OP: &str = "create_plugin_draft";
        require(OP, "template name", template)?;

        let call = Call::post(OP, Service::Builder, DRAFT_PATH)
            .credential(Credential::Session(session))
            .json(&CreateDraftRequest { template })?;

        self.fetch(call).await
    }

    /// The session's current draft.
    ///
    /// After a successful [`build_plugin`](Self::build_plugin) this is the
    /// source that was built.
    pub async fn get_plugin_draft(&self, session: &Session) -> Result<Draft> {
        self.fetch(
            Call::get("get_plugin_draft", Service::Builder, DRAFT_PATH)
                .credential(Credential::Session(session)),
        )
        .await
    }

    /// Builds `source` synchronously.
    ///
    /// The request uses the client's build timeout instead of the ordinary
    /// one. A compile failure comes back as `Ok` with `succeeded == false`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Validation`] for an empty source, before any request
    /// - [`ApiError::UnexpectedStatus`] unless the builder answers `201 Created`
    pub async fn build_plugin(
        &self,
        source: impl Into<Vec<u8>>,
        session: &Session,
    ) -> Result<BuildResult> {
        const OP: &str = "build_plugin";
        let source = source.into();
        if source.is_empty() {
            return Err(ApiError::validation(OP, "plugin source cannot be empty"));
        }

        let call = Call::post(OP, Service::Builder, "/builder/v1/draft/build")
            .credential(Credential::Session(session))
            .raw(source)
            .expect(StatusCode::CREATED)
            .timeout(self.build_timeout());

        let result: BuildResult = self.fetch(call).await?;
        tracing::info!(
            tenant = session.tenant(),
            namespace = session.namespace(),
            plugin = session.plugin(),
            succeeded = result.succeeded,
            "plugin build finished"
        );
        Ok(result)
    }

    /// Runs the built draft against `input`.
    pub async fn test_plugin_draft(
        &self,
        input: impl Into<Vec<u8>>,
        session: &Session,
    ) -> Result<TestResult> {
        self.fetch(
            Call::post("test_plugin_draft", Service::Builder, "/builder/v1/draft/test")
                .credential(Credential::Session(session))
                .raw(input.into()),
        )
        .await
    }

    /// Makes the built draft the live version of `plugin`.
    ///
    /// On success the new reference is written into `plugin`'s version; on
    /// any error `plugin` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] without a request when `session` was
    /// opened for another plugin.
    pub async fn promote_draft(
        &self,
        plugin: &mut Plugin,
        session: &Session,
    ) -> Result<PromoteResponse> {
        const OP: &str = "promote_draft";
        if !session.covers(plugin) {
            return Err(ApiError::validation(
                OP,
                format!(
                    "session for {}/{}/{} cannot promote {}",
                    session.tenant(),
                    session.namespace(),
                    session.plugin(),
                    plugin
                ),
            ));
        }

        let response: PromoteResponse = self
            .fetch(
                Call::post(OP, Service::Builder, "/builder/v1/draft/deploy")
                    .credential(Credential::Session(session)),
            )
            .await?;

        plugin.set_version(response.reference.clone());
        tracing::info!(plugin = %plugin, "draft promoted");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::tests::{client_for, ACCESS_KEY};
    use crate::config::Endpoints;
    use std::io::Write;
    use std::time::Duration;

    fn session() -> Session {
        Session::new("session-token", "acmeco", "default", "hello")
    }

    /// A mock body that only arrives after `delay`.
    fn slow_body(
        delay: Duration,
        body: &'static str,
    ) -> impl Fn(&mut dyn Write) -> std::io::Result<()> + Send + Sync + 'static {
        move |w: &mut dyn Write| {
            std::thread::sleep(delay);
            w.write_all(body.as_bytes())
        }
    }

    #[tokio::test]
    async fn test_build_outlives_ordinary_timeout() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/builder/v1/draft/build")
            .with_status(201)
            .with_chunked_body(slow_body(
                Duration::from_millis(1000),
                r#"{"succeeded": true, "outputLog": ""}"#,
            ))
            .create_async()
            .await;
        server
            .mock("POST", "/builder/v1/draft/test")
            .with_status(200)
            .with_chunked_body(slow_body(
                Duration::from_millis(1000),
                r#"{"result": "olleh", "error": ""}"#,
            ))
            .create_async()
            .await;

        let client = Se2Client::builder()
            .endpoints(Endpoints::single(&server.url()).unwrap())
            .access_key(ACCESS_KEY)
            .timeout(Duration::from_millis(250))
            .build_timeout(Duration::from_secs(10))
            .build()
            .unwrap();

        let built = client.build_plugin("source", &session()).await.unwrap();
        assert!(built.succeeded);

        let err = client.test_plugin_draft("hello", &session()).await.unwrap_err();
        assert!(matches!(err, ApiError::Network { op: "test_plugin_draft", .. }));
    }

    #[tokio::test]
    async fn test_health() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/health")
            .match_header("authorization", format!("Bearer {}", ACCESS_KEY).as_str())
            .with_status(200)
            .create_async()
            .await;

        assert!(client_for(&server).builder_health().await.unwrap());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_features() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/builder/v1/features")
            .with_status(200)
            .with_body(
                r#"{
                    "features": ["test"],
                    "languages": [
                        {"identifier": "tinygo", "short": "Go", "pretty": "Go (TinyGo)"},
                        {"identifier": "rust", "short": "Rust", "pretty": "Rust"}
                    ]
                }"#,
            )
            .create_async()
            .await;

        let features = client_for(&server).builder_features().await.unwrap();
        assert_eq!(features.features, vec!["test"]);
        assert_eq!(features.languages.len(), 2);
        assert_eq!(features.languages[0].pretty, "Go (TinyGo)");
    }

    #[tokio::test]
    async fn test_draft_uses_session_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/builder/v1/draft")
            .match_header("authorization", "Bearer session-token")
            .match_body(mockito::Matcher::Json(serde_json::json!({"template": "rust"})))
            .with_status(200)
            .with_body(r#"{"lang": "rust", "contents": "fn main() {}"}"#)
            .create_async()
            .await;

        let draft = client_for(&server)
            .create_plugin_draft("rust", &session())
            .await
            .unwrap();
        assert_eq!(draft.lang, "rust");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unknown_template() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/builder/v1/draft")
            .with_status(404)
            .with_body(r#"{"message": "template not found"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .create_plugin_draft("cobol", &session())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_empty_source_makes_no_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/builder/v1/draft/build")
            .expect(0)
            .create_async()
            .await;

        let err = client_for(&server)
            .build_plugin(Vec::new(), &session())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation { op: "build_plugin", .. }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_failed_build_is_not_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/builder/v1/draft/build")
            .match_body("fn main() {")
            .with_status(201)
            .with_body(r#"{"succeeded": false, "outputLog": "error: unclosed delimiter"}"#)
            .create_async()
            .await;

        let result = client_for(&server)
            .build_plugin("fn main() {", &session())
            .await
            .unwrap();
        assert!(!result.succeeded);
        assert!(result.output_log.contains("unclosed"));
    }

    #[tokio::test]
    async fn test_test_draft() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/builder/v1/draft/test")
            .match_body("hello")
            .with_status(200)
            .with_body(r#"{"result": "olleh", "error": ""}"#)
            .create_async()
            .await;

        let result = client_for(&server)
            .test_plugin_draft("hello", &session())
            .await
            .unwrap();
        assert_eq!(result.result, "olleh");
        assert!(result.error.is_empty());
    }

    #[tokio::test]
    async fn test_promote_updates_version() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/builder/v1/draft/deploy")
            .with_status(200)
            .with_body(r#"{"ref": "a1b2c3"}"#)
            .create_async()
            .await;

        let mut plugin = Plugin::new("com.suborbital", "acmeco", "default", "hello");
        let response = client_for(&server)
            .promote_draft(&mut plugin, &session())
            .await
            .unwrap();
        assert_eq!(response.reference, "a1b2c3");
        assert_eq!(plugin.version(), Some("a1b2c3"));
    }

    #[tokio::test]
    async fn test_failed_promote_keeps_version() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/builder/v1/draft/deploy")
            .with_status(500)
            .with_body(r#"{"message": "no build"}"#)
            .create_async()
            .await;

        let mut plugin = Plugin::new("com.suborbital", "acmeco", "default", "hello").with_version("v1");
        let client = client_for(&server);
        assert!(client.promote_draft(&mut plugin, &session()).await.is_err());
        assert_eq!(plugin.version(), Some("v1"));
    }

    #[tokio::test]
    async fn test_promote_rejects_foreign_session() {
        let server = mockito::Server::new_async().await;
        let mut plugin = Plugin::new("com.suborbital", "acmeco", "default", "other");

        let err = client_for(&server)
            .promote_draft(&mut plugin, &session())
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(plugin.version(), None);
    }
}
