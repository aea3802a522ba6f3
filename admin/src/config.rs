use std::env;
use std::time::Duration;

use url::Url;

use crate::i18n;

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the show API, e.g. `http://localhost:3000`.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Bearer token sent with every request. Read from `ADMIN_TOKEN`.
    pub token: Option<String>,
    /// Identity the session starts logged in as, if any.
    pub user_id: Option<String>,
    pub user_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DisplayConfig {
    pub currency: String,
    pub image_base_url: String,
    pub lang: String,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Config {
    /// Reads configuration from the process environment. Loading `.env` is
    /// left to the caller so it can happen before logging is set up.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url =
            env::var("SHOW_API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        Url::parse(&base_url).map_err(|_| ConfigError::InvalidValue("SHOW_API_URL".to_string()))?;

        let timeout_seconds: u64 = env::var("SHOW_API_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("SHOW_API_TIMEOUT_SECS".to_string()))?;
        if timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue(
                "SHOW_API_TIMEOUT_SECS".to_string(),
            ));
        }

        Ok(Config {
            api: ApiConfig {
                base_url,
                timeout_seconds,
            },
            auth: AuthConfig {
                token: non_empty_var("ADMIN_TOKEN"),
                user_id: non_empty_var("ADMIN_USER_ID"),
                user_name: non_empty_var("ADMIN_USER_NAME"),
            },
            display: DisplayConfig {
                currency: env::var("CURRENCY").unwrap_or_else(|_| "$".to_string()),
                image_base_url: env::var("IMAGE_BASE_URL")
                    .unwrap_or_else(|_| "https://image.tmdb.org/t/p/original".to_string()),
                lang: env::var("APP_LANG")
                    .map(|l| resolve_language(&l))
                    .unwrap_or_else(|_| i18n::DEFAULT_LANG.to_string()),
            },
        })
    }
}

/// Normalizes a language tag, falling back to the default language when the
/// catalogue has no translations for it.
fn resolve_language(raw: &str) -> String {
    let lang = i18n::normalize_language(raw);
    if i18n::is_supported_language(&lang) {
        lang
    } else {
        tracing::warn!(
            requested = raw,
            fallback = i18n::DEFAULT_LANG,
            "Unsupported APP_LANG; using default language"
        );
        i18n::DEFAULT_LANG.to_string()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api: ApiConfig {
                base_url: "http://localhost:3000".to_string(),
                timeout_seconds: 30,
            },
            auth: AuthConfig {
                token: None,
                user_id: None,
                user_name: None,
            },
            display: DisplayConfig {
                currency: "$".to_string(),
                image_base_url: "https://image.tmdb.org/t/p/original".to_string(),
                lang: i18n::DEFAULT_LANG.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_api() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:3000");
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert!(config.auth.token.is_none());
        assert_eq!(config.display.currency, "$");
        assert_eq!(config.display.lang, "en");
    }

    #[test]
    fn app_lang_is_normalized_to_a_supported_language() {
        assert_eq!(resolve_language("ru-RU"), "ru");
        assert_eq!(resolve_language("EN_us"), "en");
    }

    #[test]
    fn unsupported_app_lang_falls_back_to_default() {
        assert_eq!(resolve_language("fr-FR"), "en");
        assert_eq!(resolve_language(""), "en");
    }
}
