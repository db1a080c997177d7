//! HTTP-level tests for the Anthropic provider against a mock server

use mockito::Matcher;
use savant_provider::{
    AnthropicProvider, ChatParams, ContentBlock, McpServer, Message, Provider, ProviderError,
    StopReason,
};
use serde_json::json;

fn params() -> ChatParams {
    ChatParams {
        model: "claude-test".to_string(),
        max_tokens: 512,
        system: "system prompt".to_string(),
        messages: vec![Message::user_text("question")],
        ..Default::default()
    }
}

#[tokio::test]
async fn test_chat_sends_headers_and_parses_reply() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "test-key")
        .match_header("anthropic-version", "2023-06-01")
        .match_header("anthropic-beta", Matcher::Missing)
        .match_body(Matcher::PartialJson(json!({
            "model": "claude-test",
            "max_tokens": 512,
            "system": "system prompt"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "content": [{"type": "text", "text": "42"}],
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 5, "output_tokens": 1}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let provider = AnthropicProvider::new("test-key", Some(server.url()), None);
    let response = provider.chat(params()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.content, vec![ContentBlock::text("42")]);
    assert_eq!(response.stop_reason, StopReason::EndTurn);
}

#[tokio::test]
async fn test_chat_with_gateways_sets_beta_header() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("anthropic-beta", "mcp-client-2025-11-20")
        .match_body(Matcher::PartialJson(json!({
            "mcp_servers": [{"type": "url", "url": "https://pubmed.example/mcp", "name": "pubmed"}],
            "tools": [{"type": "mcp_toolset", "mcp_server_name": "pubmed"}]
        })))
        .with_status(200)
        .with_body(
            json!({
                "content": [
                    {"type": "mcp_tool_use", "id": "m1", "name": "search_articles",
                     "server_name": "pubmed", "input": {"query": "X"}},
                    {"type": "mcp_tool_result", "tool_use_id": "m1", "is_error": false,
                     "content": [{"type": "text", "text": "{\"articles\": []}"}]},
                    {"type": "text", "text": "Nothing found."}
                ],
                "stop_reason": "end_turn"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let provider = AnthropicProvider::new("test-key", Some(server.url()), None);
    let mut request = params();
    request.mcp_servers = vec![McpServer::url("pubmed", "https://pubmed.example/mcp")];

    let response = provider.chat(request).await.unwrap();

    mock.assert_async().await;
    assert!(response.has_tool_calls());
    assert_eq!(response.content.len(), 3);
}

#[tokio::test]
async fn test_chat_api_error_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/messages")
        .with_status(400)
        .with_body(
            json!({"type": "error", "error": {"type": "invalid_request_error", "message": "bad tools"}})
                .to_string(),
        )
        .create_async()
        .await;

    let provider = AnthropicProvider::new("test-key", Some(server.url()), None);
    let result = provider.chat(params()).await;

    match result {
        Err(ProviderError::Api(msg)) => assert_eq!(msg, "bad tools"),
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_chat_rate_limited() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/messages")
        .with_status(429)
        .with_body("slow down")
        .create_async()
        .await;

    let provider = AnthropicProvider::new("test-key", Some(server.url()), None);
    let result = provider.chat(params()).await;

    assert!(matches!(result, Err(ProviderError::RateLimited)));
}

#[tokio::test]
async fn test_chat_without_key_fails_fast() {
    let provider = AnthropicProvider::new("", Some("http://127.0.0.1:9".to_string()), None);
    let result = provider.chat(params()).await;
    assert!(matches!(result, Err(ProviderError::NoApiKey)));
}
