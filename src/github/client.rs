use async_trait::async_trait;
use base64::Engine;
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use serde::Serialize;
use tracing::debug;

use crate::error::ReviewError;
use crate::github::types::{
    CreateCommentRequest, CreateReviewRequest, FileContent, PullRequestDetails, PullRequestFile,
};

/// GitHub returns at most 100 files per page.
const FILES_PER_PAGE: usize = 100;

/// Operations the review pipeline needs from the source-control host.
#[async_trait]
pub trait PullRequestHost: Send + Sync {
    async fn list_pull_request_files(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<PullRequestFile>, ReviewError>;

    async fn get_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequestDetails, ReviewError>;

    /// Decoded content of `path` at `git_ref`.
    async fn get_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<String, ReviewError>;

    async fn create_review(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        review: CreateReviewRequest<'_>,
    ) -> Result<(), ReviewError>;

    async fn create_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<(), ReviewError>;
}

#[derive(Serialize)]
struct PageParams {
    per_page: usize,
    page: u32,
}

#[derive(Serialize)]
struct RefParams<'a> {
    #[serde(rename = "ref")]
    git_ref: &'a str,
}

#[derive(Clone)]
pub struct GitHubClient {
    client: Octocrab,
}

impl GitHubClient {
    pub fn new(token: &str, base_uri: &str) -> Result<Self, ReviewError> {
        let mut builder = Octocrab::builder()
            .base_uri(base_uri)
            .map_err(|e| ReviewError::Config(format!("Invalid GitHub API URL {}: {}", base_uri, e)))?
            .personal_token(token.to_string());
        builder.add_retry_config(RetryConfig::None);

        let client = builder
            .build()
            .map_err(|e| ReviewError::GitHub(format!("Failed to create GitHub client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PullRequestHost for GitHubClient {
    async fn list_pull_request_files(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<PullRequestFile>, ReviewError> {
        let route = format!("/repos/{}/{}/pulls/{}/files", owner, repo, number);
        let mut files = Vec::new();
        let mut page = 1u32;

        loop {
            let params = PageParams {
                per_page: FILES_PER_PAGE,
                page,
            };
            let batch: Vec<PullRequestFile> = self.client.get(&route, Some(&params)).await?;
            let batch_len = batch.len();
            files.extend(batch);

            if batch_len < FILES_PER_PAGE {
                break;
            }
            page += 1;
        }

        debug!("Listed {} files for {}/{}#{}", files.len(), owner, repo, number);
        Ok(files)
    }

    async fn get_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequestDetails, ReviewError> {
        let route = format!("/repos/{}/{}/pulls/{}", owner, repo, number);
        Ok(self.client.get(&route, None::<&()>).await?)
    }

    async fn get_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<String, ReviewError> {
        let route = format!("/repos/{}/{}/contents/{}", owner, repo, encode_path(path));
        let params = RefParams { git_ref };
        let file: FileContent = self.client.get(&route, Some(&params)).await?;
        decode_content(&file)
    }

    async fn create_review(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        review: CreateReviewRequest<'_>,
    ) -> Result<(), ReviewError> {
        let route = format!("/repos/{}/{}/pulls/{}/reviews", owner, repo, number);
        let _: serde_json::Value = self.client.post(&route, Some(&review)).await?;
        Ok(())
    }

    async fn create_issue_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<(), ReviewError> {
        let route = format!("/repos/{}/{}/issues/{}/comments", owner, repo, number);
        let _: serde_json::Value = self
            .client
            .post(&route, Some(&CreateCommentRequest { body }))
            .await?;
        Ok(())
    }
}

/// Percent-encodes each segment of a repository path, keeping the `/` separators.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Decodes the contents API transport encoding (base64 wrapped at 60 columns).
pub fn decode_content(file: &FileContent) -> Result<String, ReviewError> {
    let encoding = file.encoding.as_deref().unwrap_or("base64");
    if encoding != "base64" {
        return Err(ReviewError::GitHub(format!(
            "Unsupported content encoding: {}",
            encoding
        )));
    }

    let encoded = file
        .content
        .as_deref()
        .ok_or_else(|| ReviewError::GitHub("File content missing from response".to_string()))?;

    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| ReviewError::GitHub(format!("Failed to decode file content: {}", e)))?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
