#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Show API error: {0}")]
    ShowApi(String),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code, used as a structured field in logs.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::ShowApi(_) => "SHOW_API_ERROR",
            AppError::Request(e) if e.is_timeout() => "REQUEST_TIMEOUT",
            AppError::Request(_) => "REQUEST_FAILED",
            AppError::Url(_) => "INVALID_URL",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct_per_variant() {
        assert_eq!(AppError::Unauthorized.code(), "UNAUTHORIZED");
        assert_eq!(AppError::ShowApi("boom".into()).code(), "SHOW_API_ERROR");
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("oops")).code(),
            "INTERNAL_ERROR"
        );
    }
}
