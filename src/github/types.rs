use serde::{Deserialize, Serialize};

/// Status of a file in a pull request listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Modified,
    Removed,
    Renamed,
    #[serde(other)]
    Other,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Added => "added",
            FileStatus::Modified => "modified",
            FileStatus::Removed => "removed",
            FileStatus::Renamed => "renamed",
            FileStatus::Other => "other",
        }
    }

    /// Added and modified files are the only ones whose head content is fetched.
    pub fn has_fetchable_content(&self) -> bool {
        matches!(self, FileStatus::Added | FileStatus::Modified)
    }
}

/// Entry of `GET /repos/{owner}/{repo}/pulls/{number}/files`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestFile {
    pub filename: String,
    pub status: FileStatus,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
    #[serde(default)]
    pub changes: u64,
    #[serde(default)]
    pub patch: Option<String>,
}

/// Subset of `GET /repos/{owner}/{repo}/pulls/{number}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestDetails {
    pub head: CommitRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRef {
    pub sha: String,
}

/// Response of `GET /repos/{owner}/{repo}/contents/{path}` for a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileContent {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateReviewRequest<'a> {
    pub commit_id: &'a str,
    pub body: &'a str,
    pub event: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateCommentRequest<'a> {
    pub body: &'a str,
}

/// A changed file after collection: patch always, full content when it could be fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangedFile {
    pub filename: String,
    pub status: FileStatus,
    pub additions: u64,
    pub deletions: u64,
    pub patch: Option<String>,
    pub content: Option<String>,
    pub language: &'static str,
}

/// Pull request identity and metadata taken from a webhook payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PullRequestRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub draft: bool,
    pub head_sha: String,
}

// Webhook payload (only the fields the service reads)

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    pub action: Option<String>,
    pub pull_request: Option<WebhookPullRequest>,
    pub repository: Option<Repository>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPullRequest {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub draft: bool,
    pub head: CommitRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    pub owner: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
}
