use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use thiserror::Error;

use crate::issue::{Issue, NewIssue, UploadedImage};

mod issues;
mod uploads;

pub use uploads::upload_file_name;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid base url `{0}`")]
    InvalidBaseUrl(String),
    #[error("request timed out")]
    Timeout,
    #[error("server responded with {status}")]
    Status { status: reqwest::StatusCode },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("could not read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Transport(reqwest::Error),
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            return Self::Timeout;
        }
        if error.is_decode() {
            return Self::Decode(error.to_string());
        }
        if let Some(status) = error.status() {
            return Self::Status { status };
        }
        Self::Transport(error)
    }
}

/// The remote issue service. `get_issue` answers `Ok(None)` for an id the
/// server does not know, which callers render differently from an error.
#[async_trait]
pub trait IssueApi: Send + Sync {
    async fn list_issues(&self) -> Result<Vec<Issue>, ApiError>;
    async fn get_issue(&self, id: &str) -> Result<Option<Issue>, ApiError>;
    async fn create_issue(&self, issue: &NewIssue) -> Result<Option<Issue>, ApiError>;
    async fn upload_image(&self, path: &Path) -> Result<UploadedImage, ApiError>;
}

#[derive(Debug, Clone)]
pub struct IssueClient {
    client: reqwest::Client,
    base_url: Url,
}

impl IssueClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|_| ApiError::InvalidBaseUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("issuedeck"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl IssueApi for IssueClient {
    async fn list_issues(&self) -> Result<Vec<Issue>, ApiError> {
        self.fetch_issues().await
    }

    async fn get_issue(&self, id: &str) -> Result<Option<Issue>, ApiError> {
        self.fetch_issue(id).await
    }

    async fn create_issue(&self, issue: &NewIssue) -> Result<Option<Issue>, ApiError> {
        self.post_issue(issue).await
    }

    async fn upload_image(&self, path: &Path) -> Result<UploadedImage, ApiError> {
        self.post_image(path).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{ApiError, IssueClient};

    #[test]
    fn endpoint_joins_segments_onto_base_path() {
        let client = IssueClient::new("https://worker.example.dev/tracker/", Duration::from_secs(5))
            .expect("client");

        let url = client.endpoint(&["api", "issues"]).expect("url");

        assert_eq!(url.as_str(), "https://worker.example.dev/tracker/api/issues");
    }

    #[test]
    fn endpoint_encodes_identifier_segment() {
        let client =
            IssueClient::new("https://worker.example.dev", Duration::from_secs(5)).expect("client");

        let url = client.endpoint(&["api", "issues", "a/b c"]).expect("url");

        assert_eq!(url.as_str(), "https://worker.example.dev/api/issues/a%2Fb%20c");
    }

    #[test]
    fn rejects_unusable_base_url() {
        let result = IssueClient::new("not a url", Duration::from_secs(5));
        assert!(matches!(result, Err(ApiError::InvalidBaseUrl(_))));

        let result = IssueClient::new("mailto:someone@example.com", Duration::from_secs(5));
        assert!(matches!(result, Err(ApiError::InvalidBaseUrl(_))));
    }
}
