use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// Provider credentials are intentionally optional here: which provider (if
/// any) is usable gets decided per request by `ProviderConfig::resolve`, so a
/// misconfigured deployment fails with a classified 500 instead of refusing
/// to boot.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub openrouter_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub openrouter_model: Option<String>,
    pub openai_model: Option<String>,
    pub openrouter_base_url: Option<String>,
    /// Sent to OpenRouter as `HTTP-Referer` for app attribution.
    pub openrouter_site_url: Option<String>,
    /// Sent to OpenRouter as `X-Title` for app attribution.
    pub openrouter_app_name: Option<String>,
    pub port: u16,
    pub static_dir: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openrouter_api_key: optional_env("OPENROUTER_API_KEY"),
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openrouter_model: optional_env("OPENROUTER_MODEL"),
            openai_model: optional_env("OPENAI_MODEL"),
            openrouter_base_url: optional_env("OPENROUTER_BASE_URL"),
            openrouter_site_url: optional_env("OPENROUTER_SITE_URL"),
            openrouter_app_name: optional_env("OPENROUTER_APP_NAME"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            static_dir: std::env::var("STATIC_DIR").unwrap_or_else(|_| "public".to_string()),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads an environment variable, treating blank values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
