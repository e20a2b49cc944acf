//
//  se2-sdk
//  api/templates.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Template catalog on the builder.
//!
//! Templates are read-only starter sources, one per language. New ones can
//! be imported from a Git repository.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::api::client::{require, Call, Se2Client, Service};
use crate::api::common::{null_as_empty, Result};

const TEMPLATE_PATH: &str = "/template/v1";

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Template {
    /// Template name, as passed to
    /// [`Se2Client::create_plugin_draft`](crate::api::Se2Client::create_plugin_draft).
    pub name: String,

    /// Source language.
    pub lang: String,

    /// Starter source, when the listing includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,

    /// Plugin API version the template targets.
    #[serde(default)]
    pub api_version: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplateList {
    #[serde(default, deserialize_with = "null_as_empty")]
    templates: Vec<Template>,
}

#[derive(Debug, Serialize)]
struct ImportRequest<'a> {
    source: &'static str,
    params: GitParams<'a>,
}

#[derive(Debug, Serialize)]
struct GitParams<'a> {
    repo: &'a str,
    #[serde(rename = "ref")]
    reference: &'a str,
    path: &'a str,
}

impl Se2Client {
    /// Lists the templates known to the builder.
    pub async fn list_templates(&self) -> Result<Vec<Template>> {
        let list: TemplateList = self
            .fetch(Call::get("list_templates", Service::Builder, TEMPLATE_PATH))
            .await?;
        Ok(list.templates)
    }

    /// Fetches one template by name.
    pub async fn get_template(&self, name: &str) -> Result<Template> {
        const OP: &str = "get_template";
        require(OP, "template name", name)?;

        self.fetch(Call::get(OP, Service::Builder, TEMPLATE_PATH).segment(name))
            .await
    }

    /// Imports templates from a GitHub repository.
    ///
    /// # Parameters
    ///
    /// - `repo` - `owner/name` of the repository
    /// - `reference` - Branch, tag or commit to import from
    /// - `path` - Directory inside the repository holding the templates
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # async fn demo(client: &se2_sdk::api::Se2Client) -> se2_sdk::api::common::Result<()> {
    /// client
    ///     .import_templates_from_github("suborbital/sdk", "vmain", "templates")
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn import_templates_from_github(
        &self,
        repo: &str,
        reference: &str,
        path: &str,
    ) -> Result<()> {
        const OP: &str = "import_templates_from_github";
        require(OP, "repository", repo)?;
        require(OP, "git reference", reference)?;

        let call = Call::post(OP, Service::Builder, "/template/v1/import")
            .json(&ImportRequest {
                source: "git",
                params: GitParams {
                    repo,
                    reference,
                    path,
                },
            })?
            .expect(StatusCode::CREATED);

        self.execute(call).await?;
        tracing::info!(repo, reference, path, "templates imported");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::tests::client_for;
    use crate::api::common::ApiError;

    #[tokio::test]
    async fn test_list_templates() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/template/v1")
            .with_status(200)
            .with_body(
                r#"{"templates": [
                    {"name": "assemblyscript", "lang": "assemblyscript", "api_version": "0.15.0"},
                    {"name": "rust", "lang": "rust", "api_version": "0.15.0"}
                ]}"#,
            )
            .create_async()
            .await;

        let templates = client_for(&server).list_templates().await.unwrap();
        let names: Vec<_> = templates.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["assemblyscript", "rust"]);
        assert!(templates[0].main.is_none());
    }

    #[tokio::test]
    async fn test_get_template() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/template/v1/rust")
            .with_status(200)
            .with_body(
                r#"{"name": "rust", "lang": "rust", "main": "fn main() {}", "api_version": "0.15.0"}"#,
            )
            .create_async()
            .await;

        let template = client_for(&server).get_template("rust").await.unwrap();
        assert_eq!(template.main.as_deref(), Some("fn main() {}"));
    }

    #[tokio::test]
    async fn test_get_template_blank_name() {
        let server = mockito::Server::new_async().await;
        let err = client_for(&server).get_template("").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation { op: "get_template", .. }));
    }

    #[tokio::test]
    async fn test_import_templates() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/template/v1/import")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "source": "git",
                "params": {"repo": "suborbital/sdk", "ref": "vmain", "path": "templates"}
            })))
            .with_status(201)
            .create_async()
            .await;

        client_for(&server)
            .import_templates_from_github("suborbital/sdk", "vmain", "templates")
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_import_requires_created() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/template/v1/import")
            .with_status(400)
            .with_body(r#"{"message": "repository not found"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .import_templates_from_github("nobody/nothing", "main", "templates")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("repository not found"));
    }
}
