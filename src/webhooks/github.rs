use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use tracing::{info, warn};

use crate::github::webhooks::{WebhookEventType, WebhookProcessor, EVENT_HEADER, SIGNATURE_HEADER};
use crate::server::AppState;

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// `POST /webhook`: verify, filter, then run the review pipeline synchronously.
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let signature = header(&headers, SIGNATURE_HEADER);
    if !state.verifier.verify(&body, signature) {
        warn!("Rejected webhook with invalid signature");
        return (StatusCode::UNAUTHORIZED, "Invalid signature");
    }

    let event_name = header(&headers, EVENT_HEADER);
    let event = match WebhookProcessor::process_webhook(event_name, &body) {
        Ok(event) => event,
        Err(e) => {
            warn!("Failed to parse webhook payload: {}", e);
            return (StatusCode::BAD_REQUEST, "Invalid payload");
        }
    };

    match event.event_type {
        WebhookEventType::Ping => {
            info!("Received ping event");
            return (StatusCode::OK, "Pong");
        }
        WebhookEventType::Unknown => {
            info!("Ignoring {} event", event_name.unwrap_or("unknown"));
            return (StatusCode::OK, "Event ignored");
        }
        WebhookEventType::PullRequest => {}
    }

    if !event.triggers_review() {
        info!("Ignoring pull_request action: {}", event.action);
        return (StatusCode::OK, "Action ignored");
    }

    let pr = match event.pull_request_ref() {
        Ok(pr) => pr,
        Err(e) => {
            warn!("Webhook payload missing pull request data: {}", e);
            return (StatusCode::BAD_REQUEST, "Invalid payload");
        }
    };

    if pr.draft {
        info!("Skipping draft PR {}/{}#{}", pr.owner, pr.repo, pr.number);
        return (StatusCode::OK, "Draft PR skipped");
    }

    info!(
        "Reviewing PR {}/{}#{} ({})",
        pr.owner, pr.repo, pr.number, event.action
    );

    match state.pipeline.run(&pr).await {
        Ok(_) => (StatusCode::OK, "Review posted"),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Review failed"),
    }
}
