use serde::Deserialize;
use serde_json::Value;

use crate::error::ReviewError;
use crate::github::types::{PullRequestRef, WebhookPayload};

pub const EVENT_HEADER: &str = "x-github-event";
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

pub struct WebhookProcessor;

impl WebhookProcessor {
    /// Parses a verified delivery. Only JSON well-formedness is checked here;
    /// pull request fields are read on demand by [`WebhookEvent::pull_request_ref`].
    pub fn process_webhook(event_name: Option<&str>, body: &[u8]) -> Result<WebhookEvent, ReviewError> {
        let payload: Value = serde_json::from_slice(body)?;
        let action = payload
            .get("action")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let event_type = match event_name.unwrap_or_default() {
            "pull_request" => WebhookEventType::PullRequest,
            "ping" => WebhookEventType::Ping,
            _ => WebhookEventType::Unknown,
        };

        Ok(WebhookEvent {
            event_type,
            action,
            payload,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEventType {
    PullRequest,
    Ping,
    Unknown,
}

#[derive(Debug, Clone)]
pub struct WebhookEvent {
    pub event_type: WebhookEventType,
    pub action: String,
    pub payload: Value,
}

impl WebhookEvent {
    /// Only newly opened PRs and new pushes to a PR trigger a review.
    pub fn triggers_review(&self) -> bool {
        self.event_type == WebhookEventType::PullRequest
            && matches!(self.action.as_str(), "opened" | "synchronize")
    }

    pub fn pull_request_ref(&self) -> Result<PullRequestRef, ReviewError> {
        let payload = WebhookPayload::deserialize(&self.payload)?;
        let pr = payload
            .pull_request
            .ok_or_else(|| ReviewError::missing_field("pull_request"))?;
        let repository = payload
            .repository
            .ok_or_else(|| ReviewError::missing_field("repository"))?;

        Ok(PullRequestRef {
            owner: repository.owner.login,
            repo: repository.name,
            number: pr.number,
            title: pr.title,
            body: pr.body,
            draft: pr.draft,
            head_sha: pr.head.sha,
        })
    }
}
