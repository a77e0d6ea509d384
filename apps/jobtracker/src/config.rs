use anyhow::{bail, Context, Result};
use reqwest::Url;

const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Client configuration loaded from environment variables (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Url,
    /// Signs in before running a command when both are present.
    pub email: Option<String>,
    pub password: Option<String>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let raw_url = optional_env("JOBTRACKER_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Config {
            api_url: parse_api_url(&raw_url)
                .with_context(|| format!("JOBTRACKER_API_URL '{raw_url}' is not a usable base URL"))?,
            email: optional_env("JOBTRACKER_EMAIL"),
            password: optional_env("JOBTRACKER_PASSWORD"),
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.email, &self.password) {
            (Some(email), Some(password)) => Some((email.as_str(), password.as_str())),
            _ => None,
        }
    }
}

/// Accepts only `http`/`https` URLs; paths are joined onto it segment by segment.
pub fn parse_api_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).context("invalid URL")?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("unsupported scheme '{}'", url.scheme());
    }
    Ok(url)
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
