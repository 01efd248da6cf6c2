//! HTTP client for the demandview API.
//!
//! Used by the demand page and the CLI to talk to a running server.
//! Configuration is via environment variables:
//! - `DEMANDVIEW_URL` - Base URL (default: `http://localhost:8080`)

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::models::{Indicator, ModelInfo, Sector};

/// Default URL for local development.
const DEFAULT_URL: &str = "http://localhost:8080";

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    Server(String),
}

/// HTTP client for the demandview API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Create client from environment variables.
    pub fn from_env() -> Self {
        let base_url = std::env::var("DEMANDVIEW_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
        Self::new(base_url)
    }

    /// Create with an explicit base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.get(format!("{}{}", self.base_url, path))
    }

    /// Handle response, converting HTTP errors to ClientError.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            match status {
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(body)),
                StatusCode::BAD_REQUEST => Err(ClientError::BadRequest(body)),
                _ => Err(ClientError::Server(format!("{}: {}", status, body))),
            }
        }
    }

    // ============================================================
    // Models
    // ============================================================

    /// List the models the server has loaded.
    pub async fn get_models(&self) -> Result<Vec<ModelInfo>, ClientError> {
        let response = self.get("/api/models").send().await?;
        self.handle_response(response).await
    }

    // ============================================================
    // Sectors and indicators
    // ============================================================

    /// Get the sectors of a model, in matrix index order.
    pub async fn get_sectors(&self, model: &str) -> Result<Vec<Sector>, ClientError> {
        let response = self.get(&format!("/api/{}/sectors", model)).send().await?;
        self.handle_response(response).await
    }

    /// Get the indicators of a model, in matrix index order.
    pub async fn get_indicators(&self, model: &str) -> Result<Vec<Indicator>, ClientError> {
        let response = self
            .get(&format!("/api/{}/indicators", model))
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Get the sectors of the default model, sorted by name. This is the
    /// fetch behind the demand table.
    pub async fn get_default_sectors(&self) -> Result<Vec<Sector>, ClientError> {
        let response = self.get("/api/sectors").send().await?;
        self.handle_response(response).await
    }

    /// Same fetch as [`ApiClient::get_default_sectors`], but the body is
    /// kept as a raw JSON value for diagnostic logging.
    pub async fn get_default_sectors_raw(&self) -> Result<Value, ClientError> {
        let response = self.get("/api/sectors").send().await?;
        self.handle_response(response).await
    }

    // ============================================================
    // Matrices
    // ============================================================

    /// Get a whole numeric matrix as rows of floats.
    pub async fn get_matrix(&self, model: &str, name: &str) -> Result<Vec<Vec<f64>>, ClientError> {
        let response = self
            .get(&format!("/api/{}/matrix/{}", model, name))
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Get one row of a numeric matrix.
    pub async fn get_matrix_row(
        &self,
        model: &str,
        name: &str,
        row: usize,
    ) -> Result<Vec<f64>, ClientError> {
        let response = self
            .get(&format!("/api/{}/matrix/{}?row={}", model, name, row))
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Get one column of a numeric matrix.
    pub async fn get_matrix_col(
        &self,
        model: &str,
        name: &str,
        col: usize,
    ) -> Result<Vec<f64>, ClientError> {
        let response = self
            .get(&format!("/api/{}/matrix/{}?col={}", model, name, col))
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Get a whole data quality matrix as rows of entry strings.
    pub async fn get_dqi_matrix(
        &self,
        model: &str,
        name: &str,
    ) -> Result<Vec<Vec<String>>, ClientError> {
        let response = self
            .get(&format!("/api/{}/matrix/{}", model, name))
            .send()
            .await?;
        self.handle_response(response).await
    }
}
