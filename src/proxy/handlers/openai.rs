// OpenAI-compatible chat completions handler
use axum::{
    extract::{Json, State},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::{debug, error};

use crate::error::ProxyError;
use crate::proxy::mappers::{build_upstream_request, transform_completion_response};
use crate::proxy::server::AppState;

/// Forward one chat-completion request to the NIM upstream.
///
/// The upstream status code is propagated verbatim, 4xx/5xx included; only
/// the body is rewritten, and only where it matches the expected
/// choices/message/content shape.
pub async fn handle_chat_completions(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Response, ProxyError> {
    // Credential check happens before any upstream I/O
    let api_key = match state.config.api_key.as_deref() {
        Some(key) if !key.is_empty() => key,
        _ => return Err(ProxyError::MissingCredential),
    };

    let outbound = build_upstream_request(&body);
    debug!(
        "Forwarding chat completion for model: {}",
        outbound
            .get("model")
            .and_then(|m| m.as_str())
            .unwrap_or("unknown")
    );

    let response = match state.upstream.chat_completions(api_key, &outbound).await {
        Ok(r) => r,
        Err(e) => {
            error!("Upstream request failed: {}", e);
            return Err(ProxyError::Upstream(e));
        }
    };

    let status = response.status();

    let upstream_body: Value = match response.json().await {
        Ok(v) => v,
        Err(e) => {
            error!("Failed to parse upstream response: {}", e);
            return Err(ProxyError::Upstream(e));
        }
    };

    let transformed = transform_completion_response(upstream_body);

    Ok((status, Json(transformed)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::config::ProxyConfig;
    use crate::proxy::upstream::UpstreamClient;
    use axum::http::StatusCode;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::sync::Arc;

    fn test_state(api_key: Option<&str>, upstream_url: String) -> AppState {
        let config = ProxyConfig {
            port: 0,
            api_key: api_key.map(|k| k.to_string()),
            ..ProxyConfig::default()
        }
        .with_upstream_url(upstream_url);

        AppState {
            upstream: Arc::new(UpstreamClient::new(config.upstream_url.clone())),
            config: Arc::new(config),
        }
    }

    async fn call(state: AppState, body: Value) -> (StatusCode, Value) {
        let response = handle_chat_completions(State(state), Json(body))
            .await
            .into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_missing_credential_short_circuits() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).body(r#"{"choices": []}"#);
        });

        let state = test_state(None, server.url("/v1/chat/completions"));
        let (status, body) = call(state, json!({"messages": []})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["error"],
            "NIM_API_KEY environment variable is not set"
        );
        // No upstream call may have been attempted
        assert_eq!(mock.hits(), 0);
    }

    #[tokio::test]
    async fn test_default_model_reaches_upstream() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .json_body_partial(
                    r#"{"model": "deepseek-ai/deepseek-r1-distill-qwen-14b"}"#,
                );
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"choices": []}));
        });

        let state = test_state(Some("test-key"), server.url("/v1/chat/completions"));
        let (status, _) = call(
            state,
            json!({"messages": [{"role": "user", "content": "hi"}]}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        mock.assert();
    }

    #[tokio::test]
    async fn test_thinking_tags_stripped_from_choices() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "id": "cmpl-9",
                    "choices": [{
                        "index": 0,
                        "message": {
                            "role": "assistant",
                            "content": "<thinking>step by\nstep</thinking>The answer is 4."
                        },
                        "finish_reason": "stop"
                    }]
                }));
        });

        let state = test_state(Some("test-key"), server.url("/v1/chat/completions"));
        let (status, body) = call(state, json!({"messages": []})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["choices"][0]["message"]["content"], "The answer is 4.");
        assert_eq!(body["id"], "cmpl-9");
        assert_eq!(body["choices"][0]["finish_reason"], "stop");
    }

    #[tokio::test]
    async fn test_upstream_status_propagated() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(429)
                .header("content-type", "application/json")
                .json_body(json!({"error": {"message": "rate limited", "code": 429}}));
        });

        let state = test_state(Some("test-key"), server.url("/v1/chat/completions"));
        let (status, body) = call(state, json!({"messages": []})).await;

        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"]["message"], "rate limited");
    }

    #[tokio::test]
    async fn test_network_fault_yields_error_and_details() {
        // Nothing listens on port 9; the connect fails immediately
        let state = test_state(Some("test-key"), "http://127.0.0.1:9/v1/chat/completions".into());
        let (status, body) = call(state, json!({"messages": []})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Proxy request failed");
        assert!(body["details"].is_string());
    }

    #[tokio::test]
    async fn test_handler_survives_non_json_upstream_body() {
        let server = MockServer::start();
        let mut bad = server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).body("not json at all");
        });

        let state = test_state(Some("test-key"), server.url("/v1/chat/completions"));
        let (status, body) = call(state.clone(), json!({"messages": []})).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Proxy request failed");
        assert!(body["details"].is_string());

        // Same state keeps serving once the upstream recovers
        bad.delete();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"choices": []}));
        });

        let (status, _) = call(state, json!({"messages": []})).await;
        assert_eq!(status, StatusCode::OK);
    }
}
