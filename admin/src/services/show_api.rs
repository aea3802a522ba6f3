use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};

const NOW_PLAYING_PATH: &str = "api/show/now-playing";
const ADD_SHOW_PATH: &str = "api/show/add";

// ============================================================================
// Movie Types
// ============================================================================

/// A movie the backend reports as currently playing. Read-only here.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MovieCandidate {
    #[serde(deserialize_with = "deserialize_movie_id")]
    pub id: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct NowPlayingResponse {
    pub success: bool,
    #[serde(default)]
    pub movies: Vec<MovieCandidate>,
}

/// Catalogue ids arrive either as strings or as plain numbers.
fn deserialize_movie_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

// ============================================================================
// Show Types
// ============================================================================

/// One scheduled screening: a calendar date and a time of day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShowSlot {
    pub date: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddShowRequest {
    pub movie_id: String,
    pub shows_input: Vec<ShowSlot>,
    pub show_price: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddShowResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

// ============================================================================
// Backend
// ============================================================================

/// The two calls the show composer makes against the show API.
#[async_trait]
pub trait ShowBackend: Send + Sync {
    async fn now_playing(&self, token: &str) -> AppResult<NowPlayingResponse>;

    async fn add_show(&self, token: &str, request: &AddShowRequest)
        -> AppResult<AddShowResponse>;
}

#[derive(Debug, Clone)]
pub struct ShowApiClient {
    client: Client,
    base_url: Url,
}

impl ShowApiClient {
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Internal(e.into()))?;

        let mut base_url = Url::parse(&config.base_url)?;
        // Endpoints are joined relative to the base, so keep any path prefix.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> AppResult<Url> {
        Ok(self.base_url.join(path)?)
    }
}

#[async_trait]
impl ShowBackend for ShowApiClient {
    async fn now_playing(&self, token: &str) -> AppResult<NowPlayingResponse> {
        let url = self.endpoint(NOW_PLAYING_PATH)?;
        tracing::debug!(%url, "fetching now playing movies");

        let response = self.client.get(url).bearer_auth(token).send().await?;

        read_json(response, "fetch now playing movies").await
    }

    async fn add_show(
        &self,
        token: &str,
        request: &AddShowRequest,
    ) -> AppResult<AddShowResponse> {
        let url = self.endpoint(ADD_SHOW_PATH)?;
        tracing::debug!(
            %url,
            movie_id = %request.movie_id,
            slots = request.shows_input.len(),
            "posting show"
        );

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;

        read_json(response, "add show").await
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response, action: &str) -> AppResult<T> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(AppError::ShowApi(format!(
            "Failed to {} ({}): {}",
            action, status, error_text
        )));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| AppError::ShowApi(format!("Failed to parse {} response: {}", action, e)))
}
