use std::fmt::Write;

use crate::github::types::ChangedFile;

pub const NO_PATCH_PLACEHOLDER: &str = "No patch available";
pub const NO_CONTENT_NOTE: &str = "Full file content not available (review based on diff only).";
pub const NO_DESCRIPTION_PLACEHOLDER: &str = "No description provided";

/// Section heading the model is told to end its review with.
pub const RECOMMENDATION_HEADING: &str = "## 🏁 Recommendation";

pub const SYSTEM_PROMPT: &str = "You are an expert senior software engineer performing a code review \
on a GitHub pull request. Review the changes for correctness, bugs, security problems, \
performance, readability and maintainability. Be specific, cite file names, and keep \
feedback actionable. Always finish with the recommendation section exactly as requested.";

/// Renders the user prompt for one pull request. Files appear in the given order.
pub fn build_review_prompt(files: &[ChangedFile], description: Option<&str>, title: &str) -> String {
    let description = description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(NO_DESCRIPTION_PLACEHOLDER);

    let mut prompt = String::new();
    let _ = writeln!(prompt, "Please review the following pull request.\n");
    let _ = writeln!(prompt, "## Pull Request Information");
    let _ = writeln!(prompt, "**Title:** {}", title);
    let _ = writeln!(prompt, "**Description:**\n{}\n", description);
    let _ = writeln!(prompt, "## Changed Files ({})\n", files.len());

    for file in files {
        let _ = writeln!(prompt, "### File: {}", file.filename);
        let _ = writeln!(prompt, "**Language:** {}", file.language);
        let _ = writeln!(prompt, "**Status:** {}", file.status.as_str());
        let _ = writeln!(
            prompt,
            "**Changes:** +{} -{}\n",
            file.additions, file.deletions
        );

        let patch = file.patch.as_deref().unwrap_or(NO_PATCH_PLACEHOLDER);
        let fence = fence_for(patch);
        let _ = writeln!(prompt, "**Diff:**");
        let _ = writeln!(prompt, "{}diff", fence);
        let _ = writeln!(prompt, "{}", patch);
        let _ = writeln!(prompt, "{}\n", fence);

        match &file.content {
            Some(content) => {
                let fence = fence_for(content);
                let _ = writeln!(prompt, "**Full file content:**");
                let _ = writeln!(prompt, "{}{}", fence, fence_tag(file.language));
                let _ = writeln!(prompt, "{}", content);
                let _ = writeln!(prompt, "{}\n", fence);
            }
            None => {
                let _ = writeln!(prompt, "*{}*\n", NO_CONTENT_NOTE);
            }
        }
    }

    let _ = writeln!(prompt, "## Review Format\n");
    let _ = writeln!(prompt, "Structure your review with these sections:");
    let _ = writeln!(prompt, "## 📋 Summary");
    let _ = writeln!(prompt, "## 🔍 Issues Found (mark critical issues as **Critical**)");
    let _ = writeln!(prompt, "## 💡 Suggestions");
    let _ = writeln!(prompt, "## ✅ Strengths");
    let _ = writeln!(prompt, "{}", RECOMMENDATION_HEADING);
    let _ = write!(
        prompt,
        "End with exactly one of **APPROVE**, **REQUEST_CHANGES** or **COMMENT** \
         on the line after the recommendation heading."
    );

    prompt
}

/// Backtick fence longer than any backtick run inside `text`, and never shorter than three.
fn fence_for(text: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in text.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    "`".repeat((longest + 1).max(3))
}

fn fence_tag(language: &str) -> String {
    language
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}
