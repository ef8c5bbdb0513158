use std::sync::Arc;

use axum::{
    response::Json,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::crypto::WebhookSignatureVerifier;
use crate::error::ReviewError;
use crate::github::client::{GitHubClient, PullRequestHost};
use crate::review::generator::{CompletionClient, OpenAiClient};
use crate::review::ReviewPipeline;
use crate::webhooks;

/// Process-wide, read-only state shared by all requests.
#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<WebhookSignatureVerifier>,
    pub pipeline: Arc<ReviewPipeline>,
}

impl AppState {
    pub fn new(
        webhook_secret: &str,
        host: Arc<dyn PullRequestHost>,
        completion: Arc<dyn CompletionClient>,
    ) -> Self {
        Self {
            verifier: Arc::new(WebhookSignatureVerifier::new(webhook_secret)),
            pipeline: Arc::new(ReviewPipeline::new(host, completion)),
        }
    }

    /// Builds the production GitHub and completion clients from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, ReviewError> {
        let host = GitHubClient::new(&config.github_token, &config.github_api_url)?;
        let completion = OpenAiClient::new(
            &config.openai_api_key,
            &config.openai_api_url,
            &config.openai_model,
        )?;

        Ok(Self::new(
            &config.github_webhook_secret,
            Arc::new(host),
            Arc::new(completion),
        ))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/webhook", post(webhooks::github::handle_webhook))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .into_inner(),
        )
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
