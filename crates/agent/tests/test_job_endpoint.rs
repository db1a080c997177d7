//! Tests for the job endpoint invoker against a mock server

use mockito::Matcher;
use savant_agent::{InvokeError, JobEndpointInvoker, ToolInvoker, ToolOutcome};
use savant_config::EndpointConfig;
use serde_json::json;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_invoke_posts_tool_call_job() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/runsync")
        .match_header("authorization", "Bearer rp-key")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "input": {
                "mode": "tool_call",
                "tool": "search_papers",
                "arguments": {"query": "perovskite", "min_year": 2021}
            }
        })))
        .with_status(200)
        .with_body(r#"{"status": "COMPLETED", "output": {"result": "{\"results\": [1]}"}}"#)
        .create_async()
        .await;

    let invoker = JobEndpointInvoker::new(server.url(), "rp-key");
    let outcome = invoker
        .invoke(
            "search_papers",
            &json!({"query": "perovskite", "min_year": 2021}),
            TIMEOUT,
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(outcome, ToolOutcome::success("{\"results\": [1]}"));
}

#[tokio::test]
async fn test_invoke_failed_job() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/runsync")
        .with_status(200)
        .with_body(r#"{"status": "FAILED", "error": "handler raised"}"#)
        .create_async()
        .await;

    let invoker = JobEndpointInvoker::new(server.url(), "rp-key");
    let outcome = invoker
        .invoke("database_stats", &json!({}), TIMEOUT)
        .await
        .unwrap();

    assert_eq!(outcome, ToolOutcome::error("Error: handler raised"));
}

#[tokio::test]
async fn test_invoke_in_progress_job() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/runsync")
        .with_status(200)
        .with_body(r#"{"id": "abc", "status": "IN_PROGRESS"}"#)
        .create_async()
        .await;

    let invoker = JobEndpointInvoker::new(server.url(), "rp-key");
    let outcome = invoker
        .invoke("get_paper_pdf", &json!({"bibtex_key": "Smith2024"}), TIMEOUT)
        .await
        .unwrap();

    assert!(outcome.is_error);
    assert!(outcome.content.contains("try again later"));
}

#[tokio::test]
async fn test_http_error_is_transport_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/runsync")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let invoker = JobEndpointInvoker::new(server.url(), "rp-key");
    let result = invoker.invoke("database_stats", &json!({}), TIMEOUT).await;

    assert!(matches!(result, Err(InvokeError::Request(_))));
}

#[tokio::test]
async fn test_malformed_body_is_transport_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/runsync")
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create_async()
        .await;

    let invoker = JobEndpointInvoker::new(server.url(), "rp-key");
    let result = invoker.invoke("database_stats", &json!({}), TIMEOUT).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_from_config_uses_api_base_override() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/runsync")
        .match_header("authorization", "Bearer from-config")
        .with_status(200)
        .with_body(r#"{"status": "COMPLETED"}"#)
        .create_async()
        .await;

    let config = EndpointConfig {
        api_key: "from-config".to_string(),
        endpoint_id: "ignored".to_string(),
        api_base: Some(format!("{}/", server.url())),
    };
    let invoker = JobEndpointInvoker::from_config(&config);
    let outcome = invoker
        .invoke("database_stats", &json!({}), TIMEOUT)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(outcome, ToolOutcome::success("{}"));
}

#[test]
fn test_from_config_default_base() {
    let config = EndpointConfig {
        api_key: "k".to_string(),
        endpoint_id: "abc123".to_string(),
        api_base: None,
    };
    let invoker = JobEndpointInvoker::from_config(&config);
    assert_eq!(invoker.base_url(), "https://api.runpod.ai/v2/abc123");
}
