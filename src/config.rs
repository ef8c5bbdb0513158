use std::env;
use std::fmt;

use crate::error::ReviewError;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4";

#[derive(Clone)]
pub struct AppConfig {
    pub github_token: String,
    pub github_webhook_secret: String,
    pub github_api_url: String,
    pub openai_api_key: String,
    pub openai_api_url: String,
    pub openai_model: String,
    pub server_host: String,
    pub server_port: u16,
}

impl AppConfig {
    pub fn load() -> Result<Self, ReviewError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ReviewError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ReviewError::missing_env(name))
        };
        let optional = |name: &str, default: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let github_token = required("GITHUB_TOKEN")?;
        let github_webhook_secret = required("GITHUB_WEBHOOK_SECRET")?;
        let openai_api_key = required("OPENAI_API_KEY")?;

        let server_port = match lookup("PORT").filter(|value| !value.trim().is_empty()) {
            Some(port) => port.trim().parse().map_err(|e| {
                ReviewError::Config(format!("PORT must be a valid port number ({}): {}", port, e))
            })?,
            None => DEFAULT_PORT,
        };

        Ok(AppConfig {
            github_token,
            github_webhook_secret,
            github_api_url: optional("GITHUB_API_URL", DEFAULT_GITHUB_API_URL),
            openai_api_key,
            openai_api_url: optional("OPENAI_API_URL", DEFAULT_OPENAI_API_URL),
            openai_model: optional("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            server_host: optional("SERVER_HOST", "0.0.0.0"),
            server_port,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("github_token", &"<redacted>")
            .field("github_webhook_secret", &"<redacted>")
            .field("github_api_url", &self.github_api_url)
            .field("openai_api_key", &"<redacted>")
            .field("openai_api_url", &self.openai_api_url)
            .field("openai_model", &self.openai_model)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("GITHUB_TOKEN", "ghp_test"),
        ("GITHUB_WEBHOOK_SECRET", "s3cret"),
        ("OPENAI_API_KEY", "sk-test"),
    ];

    #[test]
    fn test_defaults_applied() {
        let config = AppConfig::from_lookup(lookup_from(&REQUIRED)).unwrap();
        assert_eq!(config.server_port, DEFAULT_PORT);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.github_api_url, DEFAULT_GITHUB_API_URL);
        assert_eq!(config.openai_api_url, DEFAULT_OPENAI_API_URL);
        assert_eq!(config.openai_model, DEFAULT_OPENAI_MODEL);
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_port_override() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("PORT", "8080"));
        let config = AppConfig::from_lookup(lookup_from(&vars)).unwrap();
        assert_eq!(config.server_port, 8080);
    }

    #[test]
    fn test_invalid_port_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("PORT", "not-a-port"));
        let result = AppConfig::from_lookup(lookup_from(&vars));
        assert!(matches!(result, Err(ReviewError::Config(_))));
    }

    #[test]
    fn test_missing_required_variable() {
        for skipped in ["GITHUB_TOKEN", "GITHUB_WEBHOOK_SECRET", "OPENAI_API_KEY"] {
            let vars: Vec<_> = REQUIRED
                .iter()
                .copied()
                .filter(|(name, _)| *name != skipped)
                .collect();
            let err = AppConfig::from_lookup(lookup_from(&vars)).unwrap_err();
            assert!(err.to_string().contains(skipped), "unexpected error: {}", err);
        }
    }

    #[test]
    fn test_blank_required_variable_is_missing() {
        let mut vars = REQUIRED.to_vec();
        vars[1] = ("GITHUB_WEBHOOK_SECRET", "   ");
        assert!(AppConfig::from_lookup(lookup_from(&vars)).is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AppConfig::from_lookup(lookup_from(&REQUIRED)).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("ghp_test"));
        assert!(!rendered.contains("s3cret"));
        assert!(!rendered.contains("sk-test"));
    }
}
