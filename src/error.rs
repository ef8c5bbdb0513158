use thiserror::Error;

impl From<octocrab::Error> for ReviewError {
    fn from(err: octocrab::Error) -> Self {
        Self::GitHub(err.to_string())
    }
}

impl From<reqwest::Error> for ReviewError {
    fn from(err: reqwest::Error) -> Self {
        Self::Completion(err.to_string())
    }
}

impl From<serde_json::Error> for ReviewError {
    fn from(err: serde_json::Error) -> Self {
        Self::Payload(format!("JSON error: {}", err))
    }
}

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid webhook payload: {0}")]
    Payload(String),

    #[error("GitHub API error: {0}")]
    GitHub(String),

    #[error("Completion API error: {0}")]
    Completion(String),
}

impl ReviewError {
    pub fn missing_env(name: &str) -> Self {
        Self::Config(format!("{} must be set", name))
    }

    pub fn missing_field(field: &str) -> Self {
        Self::Payload(format!("missing field `{}`", field))
    }
}
