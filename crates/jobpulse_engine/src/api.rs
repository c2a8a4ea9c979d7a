use std::time::Duration;

use futures_util::StreamExt;
use jobpulse_core::{JobHandle, ListingPage, ListingQuery, ScrapeJob, TrendSnapshot};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{ApiError, ApiErrorKind, HealthReport};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Base of the REST surface, e.g. `http://localhost:8000/api/`.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 8 * 1024 * 1024,
        }
    }
}

/// The backend operations the dashboard consumes.
#[async_trait::async_trait]
pub trait DashboardApi: Send + Sync {
    /// `POST /scrape`. Returns as soon as the backend has queued the job.
    async fn submit_scrape(&self, sources: &[String]) -> Result<JobHandle, ApiError>;

    /// `GET /scrape/{job_id}`.
    async fn scrape_status(&self, job: &JobHandle) -> Result<ScrapeJob, ApiError>;

    /// `GET /jobs` with the query's pairs.
    async fn listings(&self, query: &ListingQuery) -> Result<ListingPage, ApiError>;

    /// `GET /trends`.
    async fn trends(&self) -> Result<TrendSnapshot, ApiError>;

    /// `GET /health`.
    async fn health(&self) -> Result<HealthReport, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApi {
    base: Url,
    client: reqwest::Client,
    max_bytes: u64,
}

impl ReqwestApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let mut base = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(ApiErrorKind::InvalidUrl, err.to_string()))?;
        // Relative joins drop the last segment unless the base ends in '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(ApiErrorKind::Transport, err.to_string()))?;

        Ok(Self {
            base,
            client,
            max_bytes: settings.max_bytes,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|err| ApiError::new(ApiErrorKind::InvalidUrl, err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let request = self.client.get(url).header(ACCEPT, "application/json");
        self.send_json(request).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                ApiErrorKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.max_bytes {
                return Err(self.too_large(Some(content_len)));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > self.max_bytes {
                return Err(self.too_large(Some(next_len)));
            }
            body.extend_from_slice(&chunk);
        }

        serde_json::from_slice(&body)
            .map_err(|err| ApiError::new(ApiErrorKind::Decode, err.to_string()))
    }

    fn too_large(&self, actual: Option<u64>) -> ApiError {
        ApiError::new(
            ApiErrorKind::TooLarge {
                max_bytes: self.max_bytes,
                actual,
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl DashboardApi for ReqwestApi {
    async fn submit_scrape(&self, sources: &[String]) -> Result<JobHandle, ApiError> {
        let url = self.endpoint("scrape")?;
        let body = serde_json::to_vec(&serde_json::json!({ "sources": sources }))
            .map_err(|err| ApiError::new(ApiErrorKind::Decode, err.to_string()))?;
        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body);
        self.send_json(request).await
    }

    async fn scrape_status(&self, job: &JobHandle) -> Result<ScrapeJob, ApiError> {
        let mut url = self.endpoint("scrape/")?;
        url.path_segments_mut()
            .map_err(|()| ApiError::new(ApiErrorKind::InvalidUrl, "base cannot hold a path"))?
            .pop_if_empty()
            .push(&job.job_id);
        self.get_json(url).await
    }

    async fn listings(&self, query: &ListingQuery) -> Result<ListingPage, ApiError> {
        let mut url = self.endpoint("jobs")?;
        url.query_pairs_mut().extend_pairs(query.query_pairs());
        self.get_json(url).await
    }

    async fn trends(&self) -> Result<TrendSnapshot, ApiError> {
        let url = self.endpoint("trends")?;
        self.get_json(url).await
    }

    async fn health(&self) -> Result<HealthReport, ApiError> {
        let url = self.endpoint("health")?;
        self.get_json(url).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(ApiErrorKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(ApiErrorKind::Decode, err.to_string());
    }
    ApiError::new(ApiErrorKind::Transport, err.to_string())
}
