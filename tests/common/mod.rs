#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::Router;
use pr_review_app::crypto::WebhookSignatureVerifier;
use pr_review_app::github::client::GitHubClient;
use pr_review_app::review::generator::OpenAiClient;
use pr_review_app::server::{self, AppState};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const WEBHOOK_SECRET: &str = "test-webhook-secret";
pub const OWNER: &str = "acme";
pub const REPO: &str = "widgets";
pub const PR_NUMBER: u64 = 7;
pub const HEAD_SHA: &str = "abc123def456";

/// Router wired to wiremock servers standing in for GitHub and the completion API.
pub fn test_app(github: &MockServer, completion: &MockServer) -> Router {
    let host = GitHubClient::new("test-token", &github.uri()).expect("github client");
    let completion = OpenAiClient::new("sk-test", &completion.uri(), "gpt-4").expect("completion client");
    server::router(AppState::new(WEBHOOK_SECRET, Arc::new(host), Arc::new(completion)))
}

pub fn sign(body: &[u8]) -> String {
    WebhookSignatureVerifier::new(WEBHOOK_SECRET).sign(body)
}

/// Signed `POST /webhook` delivery for `event` with `payload`.
pub fn webhook_request(event: &str, payload: &Value) -> Request<Body> {
    let body = serde_json::to_vec(payload).expect("payload serializes");
    Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json")
        .header("x-github-event", event)
        .header("x-hub-signature-256", sign(&body))
        .body(Body::from(body))
        .expect("request builds")
}

pub async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Mock GitHub webhook payloads
pub mod github_mocks {
    use super::*;

    pub fn pull_request_payload(action: &str, draft: bool) -> Value {
        json!({
            "action": action,
            "number": PR_NUMBER,
            "pull_request": {
                "number": PR_NUMBER,
                "title": "Add greeting helper",
                "body": "Introduces a helper that greets users.",
                "draft": draft,
                "head": {
                    "sha": HEAD_SHA,
                    "ref": "feature/greeting"
                }
            },
            "repository": {
                "name": REPO,
                "full_name": format!("{}/{}", OWNER, REPO),
                "owner": {
                    "login": OWNER
                }
            }
        })
    }

    pub fn pull_request_opened_payload() -> Value {
        pull_request_payload("opened", false)
    }

    pub fn pull_request_file(filename: &str, status: &str, changes: u64) -> Value {
        json!({
            "sha": "f00d",
            "filename": filename,
            "status": status,
            "additions": changes,
            "deletions": 0,
            "changes": changes,
            "patch": format!("@@ -0,0 +1,{} @@\n+print('hello')", changes)
        })
    }

    pub fn pull_request_details() -> Value {
        json!({
            "number": PR_NUMBER,
            "state": "open",
            "head": { "sha": HEAD_SHA, "ref": "feature/greeting" },
            "base": { "sha": "0000", "ref": "main" }
        })
    }

    /// Contents API response; GitHub wraps base64 at 60 columns.
    pub fn file_content(base64_content: &str) -> Value {
        json!({
            "type": "file",
            "encoding": "base64",
            "content": format!("{}\n", base64_content)
        })
    }

    pub fn github_error(message: &str) -> Value {
        json!({
            "message": message,
            "documentation_url": "https://docs.github.com/rest"
        })
    }

    pub fn chat_completion(content: &str) -> Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        })
    }
}
