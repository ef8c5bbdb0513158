use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

/// Review outcome attached to the submitted review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Approve,
    RequestChanges,
    Comment,
}

impl Disposition {
    /// Value of the `event` field of the create-review call.
    pub fn as_event(&self) -> &'static str {
        match self {
            Disposition::Approve => "APPROVE",
            Disposition::RequestChanges => "REQUEST_CHANGES",
            Disposition::Comment => "COMMENT",
        }
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_event())
    }
}

impl FromStr for Disposition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "APPROVE" => Ok(Disposition::Approve),
            "REQUEST_CHANGES" => Ok(Disposition::RequestChanges),
            "COMMENT" => Ok(Disposition::Comment),
            other => Err(format!("unknown disposition: {}", other)),
        }
    }
}

/// Generated review text plus the disposition parsed from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewResult {
    pub body: String,
    pub disposition: Disposition,
}

impl ReviewResult {
    pub fn from_generated(body: String) -> Self {
        let disposition = parse_recommendation(&body);
        Self { body, disposition }
    }
}

fn recommendation_marker() -> Option<&'static Regex> {
    static MARKER: OnceLock<Option<Regex>> = OnceLock::new();
    MARKER
        .get_or_init(|| Regex::new(r"##\s*🏁\s*Recommendation\s*\**\s*([A-Z_]+)").ok())
        .as_ref()
}

/// Extracts the disposition from generated review text. Never fails.
///
/// The explicit `## 🏁 Recommendation` marker wins. Otherwise: "request changes",
/// or "issues found" together with "critical", means REQUEST_CHANGES; "approve" or
/// "looks good" means APPROVE; anything else is COMMENT.
pub fn parse_recommendation(text: &str) -> Disposition {
    if let Some(disposition) = recommendation_marker()
        .and_then(|marker| marker.captures(text))
        .and_then(|caps| caps.get(1))
        .and_then(|token| token.as_str().parse().ok())
    {
        return disposition;
    }

    let lower = text.to_lowercase();
    if lower.contains("request changes")
        || (lower.contains("issues found") && lower.contains("critical"))
    {
        Disposition::RequestChanges
    } else if lower.contains("approve") || lower.contains("looks good") {
        Disposition::Approve
    } else {
        Disposition::Comment
    }
}
