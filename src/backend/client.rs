//! Notification REST API Client
//!
//! HTTP client for the remote notification service. All requests are
//! bearer-token authenticated and speak JSON.

use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::model::Notification;

/// Notification REST API client
pub struct NotificationApi {
    client: Client,
    config: BackendConfig,
}

/// Configuration for the notification backend client
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL for the notification service (e.g., "http://localhost:8082/api")
    pub base_url: String,
    /// Bearer token supplied by the authentication context
    pub token: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8082/api".to_string(),
            token: String::new(),
            request_timeout_ms: 5000,
        }
    }
}

impl NotificationApi {
    /// Create a new client with the given configuration
    pub fn new(config: BackendConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Get the current configuration
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Fetch the server-authoritative unread count
    pub async fn unread_count(&self) -> Result<u64, BackendError> {
        let url = format!("{}/notifications/unread-count", self.config.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        if response.status().is_success() {
            let body: CountResponse = response.json().await.map_err(BackendError::Request)?;
            Ok(body.count)
        } else {
            Err(api_error(response).await)
        }
    }

    /// Fetch the full notification list
    pub async fn list(&self) -> Result<Vec<Notification>, BackendError> {
        let url = format!("{}/notifications", self.config.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        if response.status().is_success() {
            let body: Vec<Notification> = response.json().await.map_err(BackendError::Request)?;
            Ok(body)
        } else {
            Err(api_error(response).await)
        }
    }

    /// Mark one notification read
    pub async fn mark_read(&self, id: u64) -> Result<(), BackendError> {
        let url = format!("{}/notifications/{}/read", self.config.base_url, id);
        self.send_put(&url).await
    }

    /// Mark every notification read
    pub async fn mark_all_read(&self) -> Result<(), BackendError> {
        let url = format!("{}/notifications/read-all", self.config.base_url);
        self.send_put(&url).await
    }

    /// Soft-delete one notification.
    ///
    /// A 404 means the notification is already gone server-side and is
    /// treated as success, not an error.
    pub async fn delete(&self, id: u64) -> Result<(), BackendError> {
        let url = format!("{}/notifications/{}", self.config.base_url, id);

        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.config.token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        if response.status().is_success() || response.status() == StatusCode::NOT_FOUND {
            Ok(())
        } else {
            Err(api_error(response).await)
        }
    }

    async fn send_put(&self, url: &str) -> Result<(), BackendError> {
        let response = self
            .client
            .put(url)
            .bearer_auth(&self.config.token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(api_error(response).await)
        }
    }
}

fn map_transport_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout
    } else if e.is_connect() {
        BackendError::Unavailable
    } else {
        BackendError::Request(e)
    }
}

async fn api_error(response: reqwest::Response) -> BackendError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    BackendError::Api {
        status: status.as_u16(),
        message: text,
    }
}

// ============================================
// Response DTOs
// ============================================

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: u64,
}

// ============================================
// Errors
// ============================================

/// Errors that can occur when talking to the notification backend
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Notification service unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,
}
