use std::time::Duration;

use log::{Level, Log, Record};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{Method, StatusCode};
use thiserror::Error;

use crate::app_error::{SyncError, SyncResult};
use crate::models::Article;

pub const DEFAULT_BASE_URL: &str = "https://dev.to/api";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("dev.to api replied with {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("error encoding request object: {0}")]
    Encode(String),
    #[error("error parsing response json: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            return ApiError::Decode(value.to_string());
        }
        ApiError::Transport(value.to_string())
    }
}

/// Create-or-update access to the articles endpoint.
pub trait ArticleApi {
    fn upsert_article(&self, article: &Article) -> Result<Article, ApiError>;
}

pub struct DevtoClient {
    base_url: String,
    api_key: String,
    dump_to: Option<&'static dyn Log>,
    client: Client,
}

impl DevtoClient {
    pub fn new(base_url: &str, api_key: &str) -> SyncResult<Self> {
        let normalized_base_url = base_url.trim();
        let normalized_api_key = api_key.trim();

        if normalized_base_url.is_empty() {
            return Err(SyncError::Validation("API base URL is required".to_string()));
        }
        if normalized_api_key.is_empty() {
            return Err(SyncError::Validation("API key is required".to_string()));
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(8))
            .timeout(Duration::from_secs(20))
            .build()
            .map_err(|e| SyncError::Validation(format!("cannot build http client: {e}")))?;

        Ok(Self {
            base_url: normalized_base_url.trim_end_matches('/').to_string(),
            api_key: normalized_api_key.to_string(),
            dump_to: None,
            client,
        })
    }

    /// Dumps every request and response to `logger` at debug level.
    pub fn set_debug_logger(&mut self, logger: &'static dyn Log) {
        self.dump_to = Some(logger);
    }

    fn dump(&self, message: &str) {
        if let Some(logger) = self.dump_to {
            logger.log(
                &Record::builder()
                    .args(format_args!("{message}"))
                    .level(Level::Debug)
                    .target(module_path!())
                    .build(),
            );
        }
    }

    fn endpoint(&self, article: &Article) -> (Method, String) {
        if article.is_new() {
            (Method::POST, format!("{}/articles", self.base_url))
        } else {
            (Method::PUT, format!("{}/articles/{}", self.base_url, article.id))
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("api-key", &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
    }
}

impl ArticleApi for DevtoClient {
    fn upsert_article(&self, article: &Article) -> Result<Article, ApiError> {
        let body = serde_json::to_vec(article).map_err(|e| ApiError::Encode(e.to_string()))?;
        let (method, url) = self.endpoint(article);

        if self.dump_to.is_some() {
            self.dump(&format!("{method} {url}\n{}", String::from_utf8_lossy(&body)));
        }

        let response = self.request(method, &url).body(body).send()?;
        let status = response.status();
        let text = response.text()?;

        if self.dump_to.is_some() {
            self.dump(&format!("{status}\n{text}"));
        }

        check_status(status, text).and_then(|text| {
            serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
        })
    }
}

fn check_status(status: StatusCode, body: String) -> Result<String, ApiError> {
    if status.is_success() {
        Ok(body)
    } else {
        Err(ApiError::Status { status, body })
    }
}
