//
//  se2-sdk
//  api/session.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Builder session creation.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::api::client::{require, Call, Se2Client, Service};
use crate::api::common::{ApiError, Result};
use crate::auth::Session;

#[derive(Debug, Serialize)]
struct CreateSessionRequest<'a> {
    #[serde(rename = "fn")]
    plugin: &'a str,
    namespace: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CreateSessionResponse {
    #[serde(default)]
    token: String,
}

impl Se2Client {
    /// Opens a builder session for one plugin of a tenant.
    ///
    /// The returned [`Session`] authenticates every draft operation and
    /// remembers which tenant, namespace and plugin it was opened for.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Validation`] if any argument is blank
    /// - [`ApiError::UnexpectedStatus`] unless the service answers `201 Created`
    /// - [`ApiError::EmptyToken`] if the service answers without a token
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # async fn demo(client: &se2_sdk::api::Se2Client) -> se2_sdk::api::common::Result<()> {
    /// let session = client.create_session("acmeco", "default", "hello").await?;
    /// let draft = client.create_plugin_draft("rust", &session).await?;
    /// println!("{}", draft.contents);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_session(
        &self,
        tenant: &str,
        namespace: &str,
        plugin: &str,
    ) -> Result<Session> {
        const OP: &str = "create_session";
        require(OP, "tenant name", tenant)?;
        require(OP, "namespace", namespace)?;
        require(OP, "plugin", plugin)?;

        let call = Call::post(OP, Service::Admin, "/environment/v1/tenant")
            .segment(tenant)
            .segment("session")
            .json(&CreateSessionRequest { plugin, namespace })?
            .expect(StatusCode::CREATED);

        let response: CreateSessionResponse = self.fetch(call).await?;
        if response.token.is_empty() {
            return Err(ApiError::EmptyToken { op: OP });
        }

        tracing::debug!(tenant, namespace, plugin, "builder session created");
        Ok(Session::new(response.token, tenant, namespace, plugin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::tests::client_for;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_create_session() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/environment/v1/tenant/acmeco/session")
            .match_body(Matcher::Json(
                serde_json::json!({"fn": "hello", "namespace": "default"}),
            ))
            .with_status(201)
            .with_body(r#"{"token": "session-token"}"#)
            .create_async()
            .await;

        let session = client_for(&server)
            .create_session("acmeco", "default", "hello")
            .await
            .unwrap();
        assert_eq!(session.token(), "session-token");
        assert_eq!(session.tenant(), "acmeco");
        assert_eq!(session.namespace(), "default");
        assert_eq!(session.plugin(), "hello");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_blank_arguments() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", Matcher::Any).expect(0).create_async().await;
        let client = client_for(&server);

        for (tenant, namespace, plugin) in [("", "default", "hello"), ("acmeco", "", "hello"), ("acmeco", "default", "")] {
            let err = client
                .create_session(tenant, namespace, plugin)
                .await
                .unwrap_err();
            assert!(err.is_validation());
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_ok_instead_of_created() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/environment/v1/tenant/acmeco/session")
            .with_status(200)
            .with_body(r#"{"token": "session-token"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .create_session("acmeco", "default", "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedStatus { expected: 201, .. }));
    }
}
