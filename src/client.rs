//! Student portal HTTP client.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::PortalConfig;
use crate::error::{AppError, Result};
use crate::models::{Course, MarkRecord, StudentProfile};
use crate::source::ReportSource;

/// Portal REST client for the signed-in student.
///
/// Every request carries the configured bearer token. Non-2xx responses
/// are returned as errors.
pub struct PortalClient {
    client: Client,
    base_url: String,
    token: String,
}

impl PortalClient {
    /// Create a new client from portal settings.
    pub fn new(config: &PortalConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Replace the bearer token, e.g. from a command line flag.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{base}/{path}", base = self.base_url, path = path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!("GET {url}");

        let mut request = self.client.get(&url);
        if !self.token.is_empty() {
            request = request.bearer_auth(&self.token);
        }

        let response = request.send().await?.error_for_status()?;
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| AppError::parse(format!("Invalid response from {path}: {e}")))
    }
}

impl ReportSource for PortalClient {
    async fn profile(&self) -> Result<StudentProfile> {
        self.get_json("student/profile").await
    }

    async fn courses(&self) -> Result<Vec<Course>> {
        self.get_json("student/courses").await
    }

    async fn marks(&self) -> Result<Vec<MarkRecord>> {
        self.get_json("student/marks").await
    }

    async fn gpa(&self) -> Result<f64> {
        self.get_json("student/gpa").await
    }

    async fn total_credits(&self) -> Result<f64> {
        self.get_json("student/credits").await
    }
}
