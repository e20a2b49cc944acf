//
//  se2-sdk
//  tests/execution_test.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Plugin execution and result lookups against mock execution and admin APIs.

mod common;

use common::*;
use se2_sdk::api::{ApiError, REQUEST_ID_HEADER};
use se2_sdk::Plugin;

#[tokio::test]
async fn test_exec_missing_plugin_is_domain_error() {
    let mut ctx = TestContext::new().await;

    ctx.server
        .mock("POST", "/name/com.suborbital.t1/default/nothing-here")
        .with_status(404)
        .with_body(r#"{"code": 404, "message": "could not find plugin"}"#)
        .create_async()
        .await;

    let plugin = Plugin::new(ENVIRONMENT, "t1", "default", "nothing-here");
    match ctx.client.exec(&plugin, "hi").await {
        Err(ApiError::Execution { code, message }) => {
            assert_ne!(code, 0);
            assert!(!message.is_empty());
        }
        other => panic!("expected an execution error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_exec_then_fetch_results() {
    let mut ctx = TestContext::new().await;
    let plugin = Plugin::new(ENVIRONMENT, "t1", "default", "hello");

    ctx.server
        .mock("POST", "/name/com.suborbital.t1/default/hello")
        .match_header("authorization", ctx.bearer().as_str())
        .match_body("uh hi")
        .with_status(200)
        .with_header(REQUEST_ID_HEADER, "0f5e6a1c")
        .with_body("ih hu ,olleH")
        .create_async()
        .await;
    ctx.server
        .mock("GET", "/api/v2/results/by-uuid/0f5e6a1c")
        .with_status(200)
        .with_body(r#"{"uuid": "0f5e6a1c", "timestamp": "2024-05-01T10:00:00Z", "success": true}"#)
        .create_async()
        .await;
    ctx.server
        .mock("GET", "/api/v2/result/0f5e6a1c")
        .with_status(200)
        .with_body("ih hu ,olleH")
        .create_async()
        .await;

    let response = ctx.client.exec(&plugin, "uh hi").await.unwrap();
    let request_id = response.request_id.clone().unwrap();

    let meta = ctx.client.result_metadata(&request_id).await.unwrap();
    assert!(meta.success);
    assert!(meta.error.is_none());

    let stored = ctx.client.function_result(&meta.uuid).await.unwrap();
    assert_eq!(stored, response.body);
}

#[tokio::test]
async fn test_empty_results_and_unknown_uuid() {
    let mut ctx = TestContext::new().await;
    let plugin = Plugin::new(ENVIRONMENT, "t1", "default", "hello");

    ctx.server
        .mock("GET", "/api/v2/results/by-fqfn/com.suborbital.t1/default/hello")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;
    ctx.server
        .mock("GET", "/api/v2/results/by-uuid/does-not-exist")
        .with_status(404)
        .create_async()
        .await;

    assert!(ctx.client.results_metadata(&plugin).await.unwrap().is_empty());

    let err = ctx
        .client
        .result_metadata("does-not-exist")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_editor_token_for_deployed_plugin() {
    let mut ctx = TestContext::new().await;

    ctx.server
        .mock("GET", "/api/v2/functions/com.suborbital.t1/default")
        .with_status(200)
        .with_body(
            r#"{"functions": [{
                "name": "hello",
                "namespace": "default",
                "lang": "javascript",
                "version": "7c1fd2",
                "apiVersion": "0.15.0",
                "fqfn": "com.suborbital.t1#default::hello@7c1fd2"
            }]}"#,
        )
        .create_async()
        .await;
    ctx.server
        .mock("GET", "/api/v1/token/com.suborbital.t1/default/hello")
        .with_status(200)
        .with_body(r#"{"token": "editor-token"}"#)
        .create_async()
        .await;

    let deployed = ctx
        .client
        .user_plugins(ENVIRONMENT, "t1", "default")
        .await
        .unwrap();
    let plugin = deployed[0].to_plugin().unwrap();
    assert_eq!(plugin.version(), Some("7c1fd2"));

    let token = ctx.client.editor_token(&plugin).await.unwrap();
    assert_eq!(token, "editor-token");
}
