//! Integration tests for the Gemini client against a local stub server.
//!
//! These tests verify that:
//! - Requests carry the prompt, generation config and API key header
//! - Success bodies are reduced to the first candidate's text
//! - Status, payload and transport failures map to distinct error kinds

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use ecabot_core::{CompletionError, CompletionProvider, CompletionRequest, GenerationConfig};
use ecabot_providers::GeminiProvider;
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
struct Seen {
    path: String,
    api_key: Option<String>,
    body: serde_json::Value,
}

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    body: String,
    delay: Duration,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl Stub {
    fn new(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn seen(&self) -> Vec<Seen> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

async fn handle(
    State(stub): State<Stub>,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let seen = Seen {
        path: uri.path().to_string(),
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_str(&body).unwrap_or_default(),
    };
    if let Ok(mut all) = stub.seen.lock() {
        all.push(seen);
    }
    tokio::time::sleep(stub.delay).await;
    (stub.status, stub.body.clone())
}

/// Serve `stub` on an ephemeral port and return the API base url.
async fn serve(stub: Stub) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|e| panic!("bind stub server: {e}"));
    let addr = listener
        .local_addr()
        .unwrap_or_else(|e| panic!("stub address: {e}"));
    let app = Router::new().fallback(handle).with_state(stub);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}/v1beta")
}

fn provider(base_url: String, timeout: Duration) -> GeminiProvider {
    GeminiProvider::new("test-key".to_string(), timeout)
        .unwrap_or_else(|e| panic!("build provider: {e}"))
        .with_base_url(base_url)
        .with_model("gemini-test".to_string())
}

fn request(prompt: &str) -> CompletionRequest {
    CompletionRequest {
        prompt: prompt.to_string(),
        generation: GenerationConfig {
            temperature: 0.5,
            max_output_tokens: 500,
        },
    }
}

#[tokio::test]
async fn test_successful_completion() {
    let stub = Stub::new(
        StatusCode::OK,
        r#"{"candidates":[{"content":{"parts":[{"text":"You'll find us at P9X4+GJW, Budhanilkantha."}],"role":"model"},"finishReason":"STOP"}]}"#,
    );
    let base_url = serve(stub.clone()).await;
    let gemini = provider(base_url, Duration::from_secs(5));

    let reply = gemini.complete(&request("System: x\n\nUser: Where are you located?")).await;
    assert_eq!(
        reply,
        Ok("You'll find us at P9X4+GJW, Budhanilkantha.".to_string())
    );

    let seen = stub.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].path, "/v1beta/models/gemini-test:generateContent");
    assert_eq!(seen[0].api_key.as_deref(), Some("test-key"));
    assert_eq!(
        seen[0].body,
        serde_json::json!({
            "contents": [{ "parts": [{ "text": "System: x\n\nUser: Where are you located?" }] }],
            "generationConfig": { "temperature": 0.5, "maxOutputTokens": 500 }
        })
    );
}

#[tokio::test]
async fn test_server_error_is_status_failure() {
    let stub = Stub::new(StatusCode::INTERNAL_SERVER_ERROR, "boom");
    let gemini = provider(serve(stub).await, Duration::from_secs(5));

    let reply = gemini.complete(&request("hi")).await;
    assert_eq!(reply, Err(CompletionError::Status { status: 500 }));
}

#[tokio::test]
async fn test_unexpected_payload_is_malformed() {
    let stub = Stub::new(StatusCode::OK, r#"{"candidates":[]}"#);
    let gemini = provider(serve(stub).await, Duration::from_secs(5));

    let reply = gemini.complete(&request("hi")).await;
    assert!(matches!(reply, Err(CompletionError::MalformedResponse(_))));
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let mut stub = Stub::new(StatusCode::OK, "{}");
    stub.delay = Duration::from_secs(3);
    let gemini = provider(serve(stub).await, Duration::from_millis(200));

    let reply = gemini.complete(&request("hi")).await;
    assert!(matches!(reply, Err(CompletionError::Transport(_))));
}

#[tokio::test]
async fn test_unreachable_service_is_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|e| panic!("bind: {e}"));
    let addr = listener
        .local_addr()
        .unwrap_or_else(|e| panic!("address: {e}"));
    drop(listener);

    let gemini = provider(format!("http://{addr}/v1beta"), Duration::from_secs(2));
    let reply = gemini.complete(&request("hi")).await;
    assert!(matches!(reply, Err(CompletionError::Transport(_))));
}

#[tokio::test]
async fn test_session_falls_back_on_server_error() {
    use ecabot_core::{FALLBACK_REPLY, GREETING, SessionController, SessionSettings, Turn};

    let stub = Stub::new(StatusCode::INTERNAL_SERVER_ERROR, "boom");
    let gemini = Arc::new(provider(serve(stub.clone()).await, Duration::from_secs(5)));
    let mut session = SessionController::new(gemini, SessionSettings::default());

    let Some(handle) = session.submit("hi") else {
        panic!("submit should be accepted");
    };
    handle.settled().await;

    assert_eq!(
        session.snapshot().turns(),
        &[
            Turn::assistant(GREETING),
            Turn::user("hi"),
            Turn::assistant(FALLBACK_REPLY),
        ]
    );
    assert!(!session.is_pending());

    let seen = stub.seen();
    assert_eq!(seen.len(), 1);
    let sent = seen[0].body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default();
    assert!(sent.starts_with("System: "));
    assert!(sent.ends_with("\n\nUser: hi"));
}
