//
//  se2-sdk
//  api/execution.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Execution API
//!
//! Runs deployed plugins, either by name (the live version) or by a pinned
//! reference. Payloads and results are raw bytes.
//!
//! A plugin that fails reports `{"code": ..., "message": ...}` with a non-200
//! status; that body becomes [`ApiError::Execution`]. Any other non-200
//! answer is an [`ApiError::UnexpectedStatus`].

use reqwest::StatusCode;

use crate::api::admin::{plugin_segments, require_plugin};
use crate::api::client::{require, Call, RawResponse, Se2Client, Service};
use crate::api::common::{error_message, ApiError, ErrorBody, Result};
use crate::resource::Plugin;

/// Header carrying the executor's request identifier.
pub const REQUEST_ID_HEADER: &str = "x-suborbital-requestid";

/// Output of a successful execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResponse {
    /// What the plugin returned.
    pub body: Vec<u8>,

    /// Request identifier, usable with
    /// [`Se2Client::result_metadata`](crate::api::Se2Client::result_metadata).
    pub request_id: Option<String>,
}

impl ExecResponse {
    /// The body as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl Se2Client {
    /// Runs the live version of `plugin` with `payload` as input.
    ///
    /// ```rust,no_run
    /// use se2_sdk::Plugin;
    ///
    /// # async fn demo(client: &se2_sdk::api::Se2Client) -> se2_sdk::api::common::Result<()> {
    /// let plugin = Plugin::new("com.suborbital", "acmeco", "default", "hello");
    /// let response = client.exec(&plugin, "world").await?;
    /// println!("{}", response.text());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn exec(&self, plugin: &Plugin, payload: impl Into<Vec<u8>>) -> Result<ExecResponse> {
        const OP: &str = "exec";
        require_plugin(OP, plugin)?;

        let call = Call::post(OP, Service::Execution, "/name")
            .segments(plugin_segments(plugin))
            .raw(payload.into());
        self.run(OP, call).await
    }

    /// Runs the plugin version identified by `reference`.
    pub async fn exec_ref(&self, reference: &str, payload: impl Into<Vec<u8>>) -> Result<ExecResponse> {
        const OP: &str = "exec_ref";
        require(OP, "plugin reference", reference)?;

        let call = Call::post(OP, Service::Execution, "/ref")
            .segment(reference)
            .raw(payload.into());
        self.run(OP, call).await
    }

    async fn run(&self, op: &'static str, call: Call<'_>) -> Result<ExecResponse> {
        let response = self.send(call).await?;
        if response.status != StatusCode::OK {
            return Err(execution_error(op, &response));
        }

        let request_id = response
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        Ok(ExecResponse {
            body: response.body,
            request_id,
        })
    }
}

fn execution_error(op: &'static str, response: &RawResponse) -> ApiError {
    match serde_json::from_slice::<ErrorBody>(&response.body) {
        Ok(body) => {
            tracing::warn!(op, code = body.code, message = %body.message, "plugin execution failed");
            ApiError::Execution {
                code: body.code,
                message: body.message,
            }
        }
        Err(_) => {
            let message = error_message(response.status, &response.body);
            tracing::warn!(op, status = response.status.as_u16(), %message, "unexpected response status");
            ApiError::UnexpectedStatus {
                op,
                expected: StatusCode::OK.as_u16(),
                actual: response.status.as_u16(),
                message,
            }
        }
    }
}
