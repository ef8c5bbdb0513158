//! Diff collection for a pull request.
//!
//! Lists the changed files, keeps reviewable source files, then fetches the
//! head version of every added or modified file concurrently. A failed
//! content fetch only degrades that file to its patch.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::ReviewError;
use crate::github::client::PullRequestHost;
use crate::github::types::{ChangedFile, FileStatus, PullRequestFile};

/// Files with this many changed lines or more are left out of the prompt.
pub const MAX_FILE_CHANGES: u64 = 500;

/// Extensions considered reviewable, with the language label shown to the model.
const LANGUAGES: &[(&str, &str)] = &[
    ("py", "Python"),
    ("js", "JavaScript"),
    ("jsx", "JavaScript (JSX)"),
    ("ts", "TypeScript"),
    ("tsx", "TypeScript (TSX)"),
    ("java", "Java"),
    ("c", "C"),
    ("h", "C/C++ Header"),
    ("cc", "C++"),
    ("cpp", "C++"),
    ("hpp", "C++ Header"),
    ("cs", "C#"),
    ("go", "Go"),
    ("rs", "Rust"),
    ("rb", "Ruby"),
    ("php", "PHP"),
    ("swift", "Swift"),
    ("kt", "Kotlin"),
    ("kts", "Kotlin"),
    ("scala", "Scala"),
    ("sh", "Shell"),
    ("bash", "Shell"),
    ("sql", "SQL"),
    ("html", "HTML"),
    ("css", "CSS"),
    ("scss", "SCSS"),
    ("vue", "Vue"),
    ("svelte", "Svelte"),
    ("md", "Markdown"),
    ("yml", "YAML"),
    ("yaml", "YAML"),
    ("json", "JSON"),
    ("toml", "TOML"),
    ("xml", "XML"),
];

pub const UNKNOWN_LANGUAGE: &str = "Unknown";

fn extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Language label inferred from the file extension.
pub fn detect_language(filename: &str) -> &'static str {
    extension(filename)
        .and_then(|ext| {
            LANGUAGES
                .iter()
                .find(|(known, _)| *known == ext)
                .map(|(_, language)| *language)
        })
        .unwrap_or(UNKNOWN_LANGUAGE)
}

pub fn is_code_file(filename: &str) -> bool {
    detect_language(filename) != UNKNOWN_LANGUAGE
}

/// Keeps non-removed code files below the size ceiling, preserving order.
pub fn filter_reviewable(files: Vec<PullRequestFile>) -> Vec<PullRequestFile> {
    files
        .into_iter()
        .filter(|file| file.status != FileStatus::Removed)
        .filter(|file| is_code_file(&file.filename))
        .filter(|file| file.changes < MAX_FILE_CHANGES)
        .collect()
}

pub struct DiffCollector {
    host: Arc<dyn PullRequestHost>,
}

impl DiffCollector {
    pub fn new(host: Arc<dyn PullRequestHost>) -> Self {
        Self { host }
    }

    pub async fn collect(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<ChangedFile>, ReviewError> {
        let listed = self.host.list_pull_request_files(owner, repo, number).await?;
        let listed_count = listed.len();
        let files = filter_reviewable(listed);
        info!(
            "PR {}/{}#{}: {} of {} changed files selected for review",
            owner,
            repo,
            number,
            files.len(),
            listed_count
        );

        let details = self.host.get_pull_request(owner, repo, number).await?;
        let head_sha = details.head.sha;

        let mut tasks = Vec::with_capacity(files.len());
        for file in files {
            let host = Arc::clone(&self.host);
            let owner = owner.to_string();
            let repo = repo.to_string();
            let head_sha = head_sha.clone();

            tasks.push(tokio::spawn(async move {
                let content = if file.status.has_fetchable_content() {
                    match host
                        .get_file_content(&owner, &repo, &file.filename, &head_sha)
                        .await
                    {
                        Ok(content) => Some(content),
                        Err(e) => {
                            warn!(
                                "Could not fetch content for {}, using patch only: {}",
                                file.filename, e
                            );
                            None
                        }
                    }
                } else {
                    None
                };

                into_changed_file(file, content)
            }));
        }

        // Awaiting in spawn order keeps the listing order
        let mut collected = Vec::with_capacity(tasks.len());
        for task in tasks {
            match task.await {
                Ok(file) => collected.push(file),
                Err(e) => warn!("Dropping file after unexpected error: {}", e),
            }
        }

        Ok(collected)
    }
}

fn into_changed_file(file: PullRequestFile, content: Option<String>) -> ChangedFile {
    let language = detect_language(&file.filename);
    ChangedFile {
        filename: file.filename,
        status: file.status,
        additions: file.additions,
        deletions: file.deletions,
        patch: file.patch,
        content,
        language,
    }
}
