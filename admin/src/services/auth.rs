use async_trait::async_trait;

use crate::error::{AppError, AppResult};

/// Supplies the bearer token attached to show API requests.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn get_token(&self) -> AppResult<String>;
}

/// Token provider backed by a token configured at startup (`ADMIN_TOKEN`).
#[derive(Debug, Clone, Default)]
pub struct StaticTokenProvider {
    token: Option<String>,
}

impl StaticTokenProvider {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_token(&self) -> AppResult<String> {
        match self.token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Ok(token.to_string()),
            _ => Err(AppError::Unauthorized),
        }
    }
}

/// The administrator currently signed in to the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUser {
    pub id: String,
    pub name: Option<String>,
}

impl AdminUser {
    pub fn new(id: impl Into<String>, name: Option<String>) -> Self {
        Self {
            id: id.into(),
            name,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}
