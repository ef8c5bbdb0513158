use std::sync::Arc;

use tracing::{error, info};

use crate::error::ReviewError;
use crate::github::client::PullRequestHost;
use crate::github::types::{CreateReviewRequest, PullRequestRef};
use crate::review::recommendation::ReviewResult;

const REVIEW_FOOTER: &str =
    "\n\n---\n*🤖 This review was generated automatically. Please verify suggestions before applying them.*";

pub struct ReviewSubmitter {
    host: Arc<dyn PullRequestHost>,
}

impl ReviewSubmitter {
    pub fn new(host: Arc<dyn PullRequestHost>) -> Self {
        Self { host }
    }

    /// Posts the review with its disposition as the review event.
    pub async fn submit(&self, pr: &PullRequestRef, review: &ReviewResult) -> Result<(), ReviewError> {
        let body = format!("{}{}", review.body, REVIEW_FOOTER);
        self.host
            .create_review(
                &pr.owner,
                &pr.repo,
                pr.number,
                CreateReviewRequest {
                    commit_id: &pr.head_sha,
                    body: &body,
                    event: review.disposition.as_event(),
                },
            )
            .await?;

        info!(
            "Posted {} review on {}/{}#{}",
            review.disposition, pr.owner, pr.repo, pr.number
        );
        Ok(())
    }

    /// Tells the PR author the review failed. A failure here is only logged.
    pub async fn report_failure(&self, pr: &PullRequestRef, failure: &ReviewError) {
        let body = error_comment_body(failure);
        if let Err(e) = self
            .host
            .create_issue_comment(&pr.owner, &pr.repo, pr.number, &body)
            .await
        {
            error!(
                "Failed to post error comment on {}/{}#{}: {}",
                pr.owner, pr.repo, pr.number, e
            );
        }
    }
}

pub fn error_comment_body(failure: &ReviewError) -> String {
    format!(
        "## ❌ Automated review failed\n\nThe automated code review could not be completed:\n\n```\n{}\n```",
        failure
    )
}
