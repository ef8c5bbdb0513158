use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::error::ReviewError;
use crate::github::client::PullRequestHost;
use crate::github::types::PullRequestRef;
use crate::review::collector::DiffCollector;
use crate::review::generator::{CompletionClient, ReviewGenerator};
use crate::review::prompt::build_review_prompt;
use crate::review::recommendation::ReviewResult;
use crate::review::submitter::ReviewSubmitter;

/// collect → build prompt → generate → parse → submit, for one pull request.
pub struct ReviewPipeline {
    collector: DiffCollector,
    generator: ReviewGenerator,
    submitter: ReviewSubmitter,
}

impl ReviewPipeline {
    pub fn new(host: Arc<dyn PullRequestHost>, completion: Arc<dyn CompletionClient>) -> Self {
        Self {
            collector: DiffCollector::new(Arc::clone(&host)),
            generator: ReviewGenerator::new(completion),
            submitter: ReviewSubmitter::new(host),
        }
    }

    #[instrument(skip(self, pr), fields(owner = %pr.owner, repo = %pr.repo, pr = pr.number))]
    pub async fn review(&self, pr: &PullRequestRef) -> Result<ReviewResult, ReviewError> {
        let files = self.collector.collect(&pr.owner, &pr.repo, pr.number).await?;

        let prompt = build_review_prompt(&files, pr.body.as_deref(), &pr.title);
        info!("Requesting review for {} files ({} prompt chars)", files.len(), prompt.len());

        let text = self.generator.generate(&prompt).await?;
        let review = ReviewResult::from_generated(text);
        info!("Model recommended {}", review.disposition);

        self.submitter.submit(pr, &review).await?;
        Ok(review)
    }

    /// Runs the review; on failure posts a best-effort error comment and returns the error.
    pub async fn run(&self, pr: &PullRequestRef) -> Result<ReviewResult, ReviewError> {
        match self.review(pr).await {
            Ok(review) => Ok(review),
            Err(e) => {
                error!(
                    "Review of {}/{}#{} failed: {}",
                    pr.owner, pr.repo, pr.number, e
                );
                self.submitter.report_failure(pr, &e).await;
                Err(e)
            }
        }
    }
}
